// src/config/validate.rs

use crate::cli::CliArgs;
use crate::config::model::{Options, RawConfigFile};
use crate::errors::{GentrError, Result};

impl Options {
    /// Merge the config file under the CLI flags and validate the result.
    ///
    /// Boolean flags can only switch a setting on; a `true` in the file is
    /// kept when the flag is absent.
    pub fn from_parts(args: &CliArgs, raw: RawConfigFile) -> Result<Self> {
        let file = raw.options;
        let defaults = Options::default();

        let options = Options {
            recursive: args.recursive || file.recursive.unwrap_or(defaults.recursive),
            input: args
                .input
                .clone()
                .or(file.input)
                .unwrap_or(defaults.input),
            log: args.log || file.log.unwrap_or(defaults.log),
            length: args.length.or(file.length).unwrap_or(defaults.length),
            debug: args.debug || file.debug.unwrap_or(defaults.debug),
            log_dir: file.log_dir.unwrap_or(defaults.log_dir),
        };

        validate_options(&options)?;
        Ok(options)
    }
}

fn validate_options(options: &Options) -> Result<()> {
    if options.input.trim().is_empty() {
        return Err(GentrError::ConfigError(
            "input must not be empty".to_string(),
        ));
    }

    if options.log && !options.log_dir.is_dir() {
        return Err(GentrError::ConfigError(format!(
            "log_dir {:?} is not a directory",
            options.log_dir
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::OptionsSection;

    fn raw(options: OptionsSection) -> RawConfigFile {
        RawConfigFile { options }
    }

    #[test]
    fn defaults_apply_without_cli_or_file() {
        let opts = Options::from_parts(&CliArgs::default(), RawConfigFile::default()).unwrap();
        assert_eq!(opts, Options::default());
        assert_eq!(opts.input, ".");
    }

    #[test]
    fn cli_values_win_over_file_values() {
        let args = CliArgs {
            input: Some("src".to_string()),
            length: Some(3),
            ..CliArgs::default()
        };
        let file = raw(OptionsSection {
            input: Some("docs".to_string()),
            length: Some(10),
            recursive: Some(true),
            ..OptionsSection::default()
        });

        let opts = Options::from_parts(&args, file).unwrap();
        assert_eq!(opts.input, "src");
        assert_eq!(opts.length, 3);
        assert!(opts.recursive, "file value kept when flag is absent");
    }

    #[test]
    fn empty_input_is_rejected() {
        let args = CliArgs {
            input: Some("  ".to_string()),
            ..CliArgs::default()
        };
        match Options::from_parts(&args, RawConfigFile::default()) {
            Err(GentrError::ConfigError(msg)) => assert!(msg.contains("input")),
            other => panic!("expected ConfigError, got {other:?}"),
        }
    }

    #[test]
    fn log_dir_must_exist_when_logging() {
        let args = CliArgs {
            log: true,
            ..CliArgs::default()
        };
        let file = raw(OptionsSection {
            log_dir: Some("/definitely/not/here".into()),
            ..OptionsSection::default()
        });
        assert!(matches!(
            Options::from_parts(&args, file),
            Err(GentrError::ConfigError(_))
        ));
    }

    #[test]
    fn summary_lists_every_option() {
        let opts = Options {
            length: 5,
            log: true,
            ..Options::default()
        };
        assert_eq!(
            opts.summary(),
            "--debug false; --recursive false; --length 5; --log true; --input ."
        );
        assert!(Options::default().summary().contains("--length none"));
    }
}
