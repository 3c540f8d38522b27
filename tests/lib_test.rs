//! Library integration tests.

use bindup::BindupError;

#[test]
fn error_types_are_public() {
    let err = BindupError::ModuleUnresolvable {
        module: "aqtinstall".into(),
    };
    assert!(err.to_string().contains("aqtinstall"));
}

#[test]
fn result_type_alias_is_public() {
    fn test_fn() -> bindup::Result<()> {
        Ok(())
    }
    assert!(test_fn().is_ok());
}

#[test]
fn cli_types_are_public() {
    use bindup::cli::{Cli, Commands};
    use clap::Parser;

    let cli = Cli::parse_from(["bindup", "info", "--json"]);

    if let Some(Commands::Info(args)) = cli.command {
        assert!(args.json);
    } else {
        panic!("Expected Info command");
    }
}

#[test]
fn distro_profiles_are_public() {
    use bindup::environment::DistroIdentity;
    use bindup::provision::{lookup, ProfileLookup};

    let found = lookup(&DistroIdentity::new("ubuntu", "20.04"));
    let ProfileLookup::Recognised(profile) = found else {
        panic!("ubuntu 20.04 should be recognised");
    };
    assert_eq!(profile.config_suffix, "12");
}
