// Copyright 2025 dentsusoken
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Platform-specific process signalling.

use std::io;
use std::process::{Child, ExitStatus};

/// Ask the process to shut down gracefully.
///
/// Unix sends `SIGTERM` so the JVM runs its shutdown hooks. Windows has no
/// equivalent for console children and terminates the process outright.
/// A process that already exited is not an error.
#[cfg(unix)]
pub fn request_termination(child: &mut Child) -> io::Result<()> {
    use nix::errno::Errno;
    use nix::sys::signal::{Signal, kill};
    use nix::unistd::Pid;

    let pid = child.id();
    let raw = i32::try_from(pid)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, format!("invalid pid {pid}")))?;

    match kill(Pid::from_raw(raw), Signal::SIGTERM) {
        Ok(()) | Err(Errno::ESRCH) => Ok(()),
        Err(errno) => Err(io::Error::from(errno)),
    }
}

#[cfg(windows)]
pub fn request_termination(child: &mut Child) -> io::Result<()> {
    match child.kill() {
        Err(e) if e.kind() == io::ErrorKind::InvalidInput => Ok(()),
        other => other,
    }
}

/// Human readable form of an exit status, including the signal on Unix.
pub fn describe_exit_status(status: &ExitStatus) -> String {
    if let Some(code) = status.code() {
        return format!("exit code {code}");
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return format!("terminated by signal {signal}");
        }
    }

    status.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Command;

    #[cfg(unix)]
    #[test]
    fn request_termination_stops_sleeping_child() {
        let mut child = Command::new("sleep").arg("30").spawn().expect("spawn sleep");

        request_termination(&mut child).expect("signal sent");
        let status = child.wait().expect("wait");

        assert!(!status.success());
        assert_eq!(describe_exit_status(&status), "terminated by signal 15");
    }

    #[cfg(unix)]
    #[test]
    fn describe_exit_status_reports_code() {
        let status = Command::new("sh")
            .args(["-c", "exit 3"])
            .status()
            .expect("run sh");

        assert_eq!(describe_exit_status(&status), "exit code 3");
    }
}
