//! Argument-parsing tests for the ddlscribe CLI.

#![allow(clippy::unwrap_used)]

use clap::Parser;
use clap::error::ErrorKind;
use ddlscribe_export::cli::Cli;

fn base_args() -> Vec<&'static str> {
    vec![
        "ddlscribe",
        "--user",
        "sa",
        "--password",
        "Password123",
        "--database",
        "app",
        "--server",
        "localhost",
        "--output",
        "/tmp/ddl",
    ]
}

#[test]
fn test_valid_arguments_populate_configuration() {
    let cli = Cli::try_parse_from(base_args()).unwrap();

    assert_eq!(cli.user, "sa");
    assert_eq!(cli.password.as_str(), "Password123");
    assert_eq!(cli.database, "app");
    assert_eq!(cli.server, "localhost");
    assert_eq!(cli.output, std::path::PathBuf::from("/tmp/ddl"));
    assert_eq!(cli.verbosity, 1, "verbosity defaults to minimal");
    assert!(!cli.no_header);

    let config = cli.connection_config().unwrap();
    assert_eq!(config.server, "localhost");
    assert_eq!(config.port, 1433);
    assert_eq!(config.database, "app");
    assert_eq!(config.username, "sa");
}

#[test]
fn test_server_with_port_spec() {
    let mut args = base_args();
    args[8] = "db.example.com,14330";
    let cli = Cli::try_parse_from(args).unwrap();

    let config = cli.connection_config().unwrap();
    assert_eq!(config.server, "db.example.com");
    assert_eq!(config.port, 14330);
}

#[test]
fn test_missing_required_argument_is_usage_error() {
    let args: Vec<&str> = base_args().into_iter().filter(|a| *a != "--database" && *a != "app").collect();
    let error = Cli::try_parse_from(args).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::MissingRequiredArgument);
    // clap usage errors exit with code 2, distinct from runtime failures
    assert_eq!(error.exit_code(), 2);
}

#[test]
fn test_unknown_flag_is_usage_error() {
    let mut args = base_args();
    args.push("--frobnicate");
    assert!(Cli::try_parse_from(args).is_err());
}

#[test]
fn test_verbosity_out_of_range_is_rejected() {
    let mut args = base_args();
    args.extend(["--verbosity", "4"]);
    let error = Cli::try_parse_from(args).unwrap_err();
    assert_eq!(error.exit_code(), 2);
}

#[test]
fn test_no_header_flag() {
    let mut args = base_args();
    args.push("--no-header");
    let cli = Cli::try_parse_from(args).unwrap();
    assert!(cli.no_header);
}

#[test]
fn test_output_env_var_expansion() {
    temp_env::with_var("EXPORTS", Some("/srv/exports"), || {
        let mut args = base_args();
        args[10] = "$EXPORTS/ddl";
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.output, std::path::PathBuf::from("/srv/exports/ddl"));
    });
}

#[test]
fn test_output_braced_env_var_expansion() {
    temp_env::with_var("EXPORTS", Some("/srv/exports"), || {
        let mut args = base_args();
        args[10] = "${EXPORTS}/ddl";
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.output, std::path::PathBuf::from("/srv/exports/ddl"));
    });
}

#[test]
fn test_output_unset_env_var_expands_to_empty() {
    temp_env::with_var_unset("DDLSCRIBE_NO_SUCH_VAR", || {
        let mut args = base_args();
        args[10] = "/data/$DDLSCRIBE_NO_SUCH_VAR/ddl";
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.output, std::path::PathBuf::from("/data//ddl"));
    });
}

#[test]
fn test_output_tilde_expansion() {
    temp_env::with_var("HOME", Some("/home/exporter"), || {
        let mut args = base_args();
        args[10] = "~/ddl";
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.output, std::path::PathBuf::from("/home/exporter/ddl"));
    });
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn verbosity_in_range_is_accepted(verbosity in 0u8..=3) {
            let value = verbosity.to_string();
            let mut args = base_args();
            args.extend(["--verbosity", value.as_str()]);
            let cli = Cli::try_parse_from(args).unwrap();
            prop_assert_eq!(cli.verbosity, verbosity);
        }

        #[test]
        fn verbosity_above_range_is_rejected(verbosity in 4u16..=300) {
            let value = verbosity.to_string();
            let mut args = base_args();
            args.extend(["--verbosity", value.as_str()]);
            prop_assert!(Cli::try_parse_from(args).is_err());
        }

        #[test]
        fn valid_argument_sets_always_yield_validated_config(
            user in "[a-zA-Z][a-zA-Z0-9_]{0,16}",
            database in "[a-zA-Z][a-zA-Z0-9_]{0,16}",
            server in "[a-z][a-z0-9.]{0,20}",
            port in 1u16..,
        ) {
            let spec = format!("{server},{port}");
            let args = vec![
                "ddlscribe",
                "--user", user.as_str(),
                "--password", "pw",
                "--database", database.as_str(),
                "--server", spec.as_str(),
                "--output", "/tmp/ddl",
            ];
            let cli = Cli::try_parse_from(args).unwrap();
            let config = cli.connection_config().unwrap();
            prop_assert_eq!(&config.server, &server);
            prop_assert_eq!(config.port, port);
            prop_assert!(config.validate().is_ok());
        }
    }
}
