//! Platform-specific privilege detection.

use super::command::Invocation;

/// Program used to elevate host-mutating commands.
pub const ELEVATION_PROGRAM: &str = "sudo";

/// Check if running as root/admin.
pub fn is_elevated() -> bool {
    #[cfg(unix)]
    {
        // SAFETY: geteuid() is a simple syscall that returns the effective user ID
        unsafe { libc::geteuid() == 0 }
    }

    #[cfg(not(unix))]
    {
        false
    }
}

/// Wrap an invocation so it runs with elevated privileges.
///
/// When `already_elevated` is set the invocation is returned unchanged;
/// otherwise it is prefixed with [`ELEVATION_PROGRAM`]. The elevation program
/// resets the environment, so any env overlay is passed through `env` as
/// `KEY=VALUE` arguments instead.
pub fn privileged_with(invocation: Invocation, already_elevated: bool) -> Invocation {
    if already_elevated {
        return invocation;
    }

    let Invocation {
        program,
        args,
        env,
        cwd,
    } = invocation;

    let mut elevated_args = Vec::with_capacity(args.len() + env.len() + 2);
    if !env.is_empty() {
        elevated_args.push("env".to_string());
        elevated_args.extend(env.iter().map(|(key, value)| format!("{}={}", key, value)));
    }
    elevated_args.push(program);
    elevated_args.extend(args);

    Invocation {
        program: ELEVATION_PROGRAM.to_string(),
        args: elevated_args,
        env: Default::default(),
        cwd,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn privileged_prefixes_when_not_elevated() {
        let inv = Invocation::new("ln").args(["-s", "/a", "/b"]);
        let wrapped = privileged_with(inv, false);
        assert_eq!(wrapped.program, "sudo");
        assert_eq!(wrapped.args, vec!["ln", "-s", "/a", "/b"]);
    }

    #[test]
    fn privileged_is_identity_when_elevated() {
        let inv = Invocation::new("rm").arg("/usr/bin/llvm-config");
        let wrapped = privileged_with(inv, true);
        assert_eq!(wrapped.program, "rm");
        assert_eq!(wrapped.args, vec!["/usr/bin/llvm-config"]);
    }

    #[test]
    fn privileged_passes_env_overlay_as_arguments() {
        let inv = Invocation::new("apt-get")
            .arg("install")
            .env("DEBIAN_FRONTEND", "noninteractive");
        let wrapped = privileged_with(inv, false);
        assert_eq!(wrapped.program, "sudo");
        assert_eq!(
            wrapped.args,
            vec!["env", "DEBIAN_FRONTEND=noninteractive", "apt-get", "install"]
        );
        assert!(wrapped.env.is_empty());
    }

    #[test]
    fn elevated_invocation_keeps_env_overlay() {
        let inv = Invocation::new("apt-get").env("DEBIAN_FRONTEND", "noninteractive");
        let wrapped = privileged_with(inv, true);
        assert_eq!(wrapped.env["DEBIAN_FRONTEND"], "noninteractive");
        assert!(wrapped.args.is_empty());
    }

    #[test]
    fn is_elevated_does_not_panic() {
        let _ = is_elevated();
    }
}
