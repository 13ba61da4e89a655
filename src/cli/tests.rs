//! Argument parsing and configuration tests for the CLI surface.
//!
//! Command execution against real project trees is covered in each command
//! module and in the integration tests; these tests pin down flag parsing
//! and the flag-to-configuration mapping.

#[cfg(test)]
mod cli_tests {
    use crate::cli::Cli;
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["lattice-deploy"]).is_err());
        assert!(Cli::try_parse_from(["lattice-deploy", "prepare"]).is_ok());
    }

    #[test]
    fn test_cli_all_commands_parse() {
        let invocations = [
            vec!["lattice-deploy", "install", "acme/widgets"],
            vec!["lattice-deploy", "update", "acme/widgets"],
            vec!["lattice-deploy", "uninstall", "acme/widgets"],
            vec!["lattice-deploy", "prepare"],
        ];

        for invocation in invocations {
            assert!(
                Cli::try_parse_from(&invocation).is_ok(),
                "failed to parse {invocation:?}"
            );
        }
    }

    #[test]
    fn test_cli_verbose_flag_maps_to_debug() {
        let cli = Cli::try_parse_from(["lattice-deploy", "--verbose", "prepare"]).unwrap();
        assert!(cli.verbose);

        let config = cli.build_config();
        assert_eq!(config.log_level, Some("debug".to_string()));
        assert!(config.env_fallback);
    }

    #[test]
    fn test_cli_quiet_flag_disables_env_fallback() {
        let cli = Cli::try_parse_from(["lattice-deploy", "--quiet", "prepare"]).unwrap();
        assert!(cli.quiet);

        let config = cli.build_config();
        assert_eq!(config.log_level, None);
        assert!(!config.env_fallback);
    }

    #[test]
    fn test_cli_default_build_config() {
        let cli = Cli::try_parse_from(["lattice-deploy", "prepare"]).unwrap();

        let config = cli.build_config();
        assert_eq!(config.log_level, None);
        assert!(config.env_fallback);
    }

    #[test]
    fn test_cli_verbose_quiet_conflict() {
        let result = Cli::try_parse_from(["lattice-deploy", "--verbose", "--quiet", "prepare"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_config_option() {
        let cli = Cli::try_parse_from([
            "lattice-deploy",
            "--config",
            "/srv/site/lattice.toml",
            "prepare",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("/srv/site/lattice.toml")));
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "lattice-deploy",
            "install",
            "acme/widgets",
            "--force",
            "--verbose",
        ])
        .unwrap();

        assert!(cli.verbose);
    }

    #[test]
    fn test_cli_force_preserve_conflict() {
        let result = Cli::try_parse_from([
            "lattice-deploy",
            "install",
            "acme/widgets",
            "--force",
            "--preserve",
        ]);

        assert!(result.is_err());
    }
}
