use crate::error::KeycloakError;

pub fn get_exit_code(error: &KeycloakError) -> i32 {
    match error {
        KeycloakError::ConfigError(_) | KeycloakError::ValidationError(_) => 2,

        KeycloakError::InvalidDistribution { .. } => 3,

        KeycloakError::BuildFailed { .. } => 4,

        KeycloakError::ReadinessTimeout { .. } => 5,

        KeycloakError::Acquisition { source, .. } => match source.as_ref() {
            KeycloakError::Io(_) => 74,
            _ => 20,
        },

        KeycloakError::NetworkError(_)
        | KeycloakError::Http(_)
        | KeycloakError::HttpStatus { .. } => 20,

        KeycloakError::ProbeCancelled { .. } => 130, // Conventional exit code after SIGINT

        KeycloakError::Launch { source, .. } if source.kind() == std::io::ErrorKind::NotFound => {
            127 // Standard "command not found" exit code
        }

        _ => 1,
    }
}
