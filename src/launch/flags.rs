//! The JVM argument table used by the distribution's own `kc` launcher.

use crate::platform;
use std::path::Path;

/// One entry of the JVM argument table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum JvmFlag {
    Fixed(&'static str),
    /// `-Dprogram.name=` with the platform's launcher script.
    ProgramName,
    /// `-D<property>=<root>/<relative>`; an empty `relative` means the root.
    Directory(&'static str, &'static str),
}

pub(crate) const ENTRY_POINT: &str = "io.quarkus.bootstrap.runner.QuarkusEntryPoint";

pub(crate) const SERVER_ARGUMENTS: [&str; 2] = ["--profile=dev", "start-dev"];

pub(crate) const JVM_FLAGS: &[JvmFlag] = &[
    JvmFlag::Fixed(
        "-Djava.util.concurrent.ForkJoinPool.common.threadFactory=\
         io.quarkus.bootstrap.forkjoin.QuarkusForkJoinWorkerThreadFactory",
    ),
    JvmFlag::ProgramName,
    JvmFlag::Fixed("-XX:MetaspaceSize=96M"),
    JvmFlag::Fixed("-XX:MaxMetaspaceSize=256m"),
    JvmFlag::Fixed("-XX:+ExitOnOutOfMemoryError"),
    JvmFlag::Fixed("-Dfile.encoding=UTF-8"),
    JvmFlag::Fixed("-Dsun.stdout.encoding=UTF-8"),
    JvmFlag::Fixed("-Dsun.err.encoding=UTF-8"),
    JvmFlag::Fixed("-Dstdout.encoding=UTF-8"),
    JvmFlag::Fixed("-Dstderr.encoding=UTF-8"),
    JvmFlag::Fixed("-Djava.security.egd=file:/dev/urandom"),
    JvmFlag::Fixed("-XX:+UseG1GC"),
    JvmFlag::Fixed("-XX:FlightRecorderOptions=stackdepth=512"),
    JvmFlag::Fixed("-Xms64m"),
    JvmFlag::Fixed("-Xmx512m"),
    JvmFlag::Fixed("--add-opens=java.base/java.util=ALL-UNNAMED"),
    JvmFlag::Fixed("--add-opens=java.base/java.util.concurrent=ALL-UNNAMED"),
    JvmFlag::Fixed("--add-opens=java.base/java.security=ALL-UNNAMED"),
    JvmFlag::Fixed("-Duser.language=en"),
    JvmFlag::Fixed("-Duser.country=US"),
    JvmFlag::Directory("kc.home.dir", ""),
    JvmFlag::Directory("jboss.server.config.dir", "conf"),
    JvmFlag::Directory("keycloak.theme.dir", "themes"),
    JvmFlag::Fixed("-Djava.util.logging.manager=org.jboss.logmanager.LogManager"),
    JvmFlag::Fixed("-Dquarkus-log-max-startup-records=10000"),
    JvmFlag::Fixed("-Dpicocli.disable.closures=true"),
];

impl JvmFlag {
    /// Render the flag for a distribution rooted at `root`.
    ///
    /// Directory values are passed unquoted; the argument vector is handed to
    /// the OS without a shell in between.
    pub(crate) fn render(&self, root: &Path) -> String {
        match self {
            JvmFlag::Fixed(flag) => (*flag).to_string(),
            JvmFlag::ProgramName => {
                format!("-Dprogram.name={}", platform::launcher_script_name())
            }
            JvmFlag::Directory(property, "") => format!("-D{property}={}", root.display()),
            JvmFlag::Directory(property, relative) => {
                format!("-D{property}={}", root.join(relative).display())
            }
        }
    }
}
