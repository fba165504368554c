//! Tests for CLI argument parsing.

use super::cli::{Cli, Command};
use crate::context::InputSource;

mod parsing {
    use super::*;

    #[test]
    fn parse_minimal_args() {
        let cli = Cli::parse_from_iter(["ci-webhook", "--url", "https://example.com/hook"]);

        assert_eq!(cli.urls, vec!["https://example.com/hook"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn parse_multiple_urls_in_order() {
        let cli = Cli::parse_from_iter([
            "ci-webhook",
            "--url",
            "https://a.example.com",
            "--url",
            "https://b.example.com",
        ]);

        assert_eq!(
            cli.urls,
            vec!["https://a.example.com", "https://b.example.com"]
        );
    }

    #[test]
    fn parse_http_options() {
        let cli = Cli::parse_from_iter([
            "ci-webhook",
            "--method",
            "PUT",
            "--header",
            "X-Api-Key=secret",
            "--header",
            "Accept: text/plain",
            "--content-type",
            "text/plain",
            "--username",
            "ci",
            "--password",
            "hunter2",
            "--template",
            "{{Build.number}}",
            "--timeout",
            "15",
        ]);

        assert_eq!(cli.method.as_deref(), Some("PUT"));
        assert_eq!(cli.headers, vec!["X-Api-Key=secret", "Accept: text/plain"]);
        assert_eq!(cli.content_type.as_deref(), Some("text/plain"));
        assert_eq!(cli.username.as_deref(), Some("ci"));
        assert_eq!(cli.password.as_deref(), Some("hunter2"));
        assert_eq!(cli.template.as_deref(), Some("{{Build.number}}"));
        assert_eq!(cli.timeout, Some(15));
    }

    #[test]
    fn parse_flags() {
        let cli = Cli::parse_from_iter(["ci-webhook", "--debug", "--continue-on-error", "-v"]);

        assert!(cli.debug);
        assert!(cli.continue_on_error);
        assert!(cli.verbose);
    }

    #[test]
    fn default_values() {
        let cli = Cli::parse_from_iter(["ci-webhook"]);

        // Optional fields have no defaults in CLI - None when not specified
        assert!(cli.method.is_none());
        assert!(cli.content_type.is_none());
        assert!(cli.template.is_none());
        assert!(cli.timeout.is_none());
        // Boolean flags default to false
        assert!(!cli.debug);
        assert!(!cli.continue_on_error);
        assert!(!cli.verbose);
        // Vec fields default to empty
        assert!(cli.urls.is_empty());
        assert!(cli.headers.is_empty());
    }
}

mod input_source {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn positional_payload_is_inline() {
        let cli = Cli::parse_from_iter(["ci-webhook", r#"{"build":{}}"#]);

        assert_eq!(
            cli.input_source(),
            InputSource::Inline(r#"{"build":{}}"#.to_string())
        );
    }

    #[test]
    fn input_flag_is_file() {
        let cli = Cli::parse_from_iter(["ci-webhook", "--input", "/tmp/plugin.json"]);

        assert_eq!(
            cli.input_source(),
            InputSource::File(PathBuf::from("/tmp/plugin.json"))
        );
    }

    #[test]
    fn defaults_to_stdin() {
        let cli = Cli::parse_from_iter(["ci-webhook"]);

        assert_eq!(cli.input_source(), InputSource::Stdin);
    }

    #[test]
    fn payload_and_input_conflict() {
        let result = <Cli as clap::Parser>::try_parse_from([
            "ci-webhook",
            "{}",
            "--input",
            "/tmp/plugin.json",
        ]);

        assert!(result.is_err());
    }
}

mod init_command {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn parse_init_with_default_output() {
        let cli = Cli::parse_from_iter(["ci-webhook", "init"]);

        assert!(cli.is_init());
        match cli.command {
            Some(Command::Init { output }) => {
                assert_eq!(output, PathBuf::from("ci-webhook.toml"));
            }
            _ => panic!("Expected Init command"),
        }
    }

    #[test]
    fn parse_init_with_custom_output() {
        let cli = Cli::parse_from_iter(["ci-webhook", "init", "--output", "/custom/config.toml"]);

        match cli.command {
            Some(Command::Init { output }) => {
                assert_eq!(output, PathBuf::from("/custom/config.toml"));
            }
            _ => panic!("Expected Init command"),
        }
    }

    #[test]
    fn is_init_false_for_run_mode() {
        let cli = Cli::parse_from_iter(["ci-webhook", "--url", "https://example.com"]);

        assert!(!cli.is_init());
    }
}
