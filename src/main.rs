// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Classflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Classflow CLI entrypoint.
//!
//! By default this runs the interactive TUI on the diagram stored in a folder. The `import` and
//! `export` subcommands move a stored diagram to and from PlantUML text without a terminal UI.

use std::error::Error;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use classflow::editor::{Editor, EditorConfig};
use classflow::format::ImportGrammar;
use classflow::store::{BlobFolder, WriteDurability};

const DEFAULT_EXPORT_FILE: &str = "diagram.puml";
const LOG_ENV: &str = "CLASSFLOW_LOG";

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [<store-dir>] [--durable-writes] [--extended-import]\n  {program} --demo\n  {program} import <file.puml> [--store <dir>] [--durable-writes] [--extended-import]\n  {program} export [<out.puml>] [--store <dir>]\n\nIf store-dir/--store is omitted, the current working directory is used.\nThe diagram is kept in <store-dir>/diagram-flow.json.\n--demo opens a built-in in-memory diagram and cannot be combined with a store dir.\n\n--extended-import also reads inheritance, composition, and dependency arrows on import.\n--durable-writes opts into slower, best-effort durable persistence (fsync/sync where supported).\n\nexport writes to stdout when no output path is given.\nSet {LOG_ENV}=debug|info|warn|error to control diagnostics on stderr."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
enum Command {
    #[default]
    Tui,
    Import {
        input: String,
    },
    Export {
        output: Option<String>,
    },
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    command: Command,
    demo: bool,
    store_dir: Option<String>,
    durable_writes: bool,
    extended_import: bool,
}

fn parse_options(args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();
    let mut args = args.peekable();

    match args.peek().map(String::as_str) {
        Some("import") => {
            args.next();
            options.command = Command::Import {
                input: String::new(),
            };
        }
        Some("export") => {
            args.next();
            options.command = Command::Export { output: None };
        }
        _ => {}
    }

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--demo" => {
                if options.demo {
                    return Err(());
                }
                options.demo = true;
            }
            "--store" => {
                if options.store_dir.is_some() {
                    return Err(());
                }
                let dir = args.next().ok_or(())?;
                options.store_dir = Some(dir);
            }
            "--durable-writes" => {
                if options.durable_writes {
                    return Err(());
                }
                options.durable_writes = true;
            }
            "--extended-import" => {
                if options.extended_import {
                    return Err(());
                }
                options.extended_import = true;
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => match &mut options.command {
                Command::Tui => {
                    if options.store_dir.is_some() {
                        return Err(());
                    }
                    options.store_dir = Some(arg);
                }
                Command::Import { input } => {
                    if !input.is_empty() {
                        return Err(());
                    }
                    *input = arg;
                }
                Command::Export { output } => {
                    if output.is_some() {
                        return Err(());
                    }
                    *output = Some(arg);
                }
            },
        }
    }

    match &options.command {
        Command::Tui => {}
        Command::Import { input } if input.is_empty() => return Err(()),
        Command::Import { .. } | Command::Export { .. } => {
            if options.demo {
                return Err(());
            }
        }
    }
    if matches!(options.command, Command::Export { .. }) && options.extended_import {
        return Err(());
    }
    if options.demo && options.store_dir.is_some() {
        return Err(());
    }

    Ok(options)
}

fn editor_config(options: &CliOptions) -> EditorConfig {
    EditorConfig {
        import_grammar: if options.extended_import {
            ImportGrammar::Extended
        } else {
            ImportGrammar::Compatible
        },
        ..EditorConfig::default()
    }
}

fn open_folder(options: &CliOptions) -> Editor<BlobFolder> {
    let dir = options.store_dir.clone().unwrap_or_else(|| ".".to_owned());
    let folder = if options.durable_writes {
        BlobFolder::new(dir).with_durability(WriteDurability::Durable)
    } else {
        BlobFolder::new(dir)
    };
    Editor::open(folder, editor_config(options))
}

/// Logger reading its filter from `var`, defaulting to warnings and errors.
fn logger_builder(var: &str) -> env_logger::Builder {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or(var, "warn"))
}

fn init_logging() {
    let _ = logger_builder(LOG_ENV).try_init();
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "classflow".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        match &options.command {
            Command::Tui => {
                let export_path = PathBuf::from(DEFAULT_EXPORT_FILE);
                if options.demo {
                    classflow::tui::run(classflow::tui::demo_editor(), export_path)?;
                } else {
                    let editor = open_folder(&options);
                    let export_path = editor.store().root().join(export_path);
                    classflow::tui::run(editor, export_path)?;
                }
            }
            Command::Import { input } => {
                init_logging();
                let text = fs::read_to_string(input)?;
                let mut editor = open_folder(&options);
                let summary = editor.import_text(&text, &mut rand::thread_rng());
                if let Some(err) = editor.take_save_error() {
                    return Err(Box::new(err));
                }
                eprintln!(
                    "classflow: imported {} class(es) and {} relationship(s)",
                    summary.classes, summary.relationships
                );
            }
            Command::Export { output } => {
                init_logging();
                let mut editor = open_folder(&options);
                if let Some(err) = editor.take_save_error() {
                    return Err(Box::new(err));
                }
                let text = editor.export_text();
                match output {
                    Some(path) => fs::write(path, text)?,
                    None => io::stdout().write_all(text.as_bytes())?,
                }
            }
        }

        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("classflow: {err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{logger_builder, parse_options, CliOptions, Command};

    fn parse(args: &[&str]) -> Result<CliOptions, ()> {
        parse_options(args.iter().map(|arg| (*arg).to_owned()))
    }

    #[test]
    fn parses_empty_args() {
        let options = parse(&[]).expect("parse options");
        assert_eq!(options, CliOptions::default());
    }

    #[test]
    fn parses_demo_flag() {
        let options = parse(&["--demo"]).expect("parse options");
        assert!(options.demo);
        assert_eq!(options.command, Command::Tui);
        assert!(options.store_dir.is_none());
    }

    #[test]
    fn parses_positional_store_dir() {
        let options =
            parse(&["some/dir", "--durable-writes", "--extended-import"]).expect("parse options");
        assert_eq!(options.store_dir.as_deref(), Some("some/dir"));
        assert!(options.durable_writes);
        assert!(options.extended_import);
    }

    #[test]
    fn parses_import_command() {
        let options =
            parse(&["import", "shop.puml", "--store", "out", "--extended-import"]).expect("parse");
        assert_eq!(
            options.command,
            Command::Import {
                input: "shop.puml".to_owned()
            }
        );
        assert_eq!(options.store_dir.as_deref(), Some("out"));
        assert!(options.extended_import);
    }

    #[test]
    fn parses_export_command_with_and_without_output() {
        let options = parse(&["export"]).expect("parse options");
        assert_eq!(options.command, Command::Export { output: None });

        let options = parse(&["export", "shop.puml", "--store", "dir"]).expect("parse options");
        assert_eq!(
            options.command,
            Command::Export {
                output: Some("shop.puml".to_owned())
            }
        );
        assert_eq!(options.store_dir.as_deref(), Some("dir"));
    }

    #[rstest]
    #[case::unknown_flag(&["--nope"])]
    #[case::duplicate_demo(&["--demo", "--demo"])]
    #[case::two_store_dirs(&["one", "two"])]
    #[case::store_flag_and_positional(&["--store", "one", "two"])]
    #[case::missing_store_value(&["--store"])]
    #[case::demo_with_store(&["--demo", "some/dir"])]
    #[case::import_without_file(&["import"])]
    #[case::import_two_files(&["import", "a.puml", "b.puml"])]
    #[case::export_two_files(&["export", "a.puml", "b.puml"])]
    #[case::export_with_demo(&["export", "--demo"])]
    #[case::export_with_import_grammar(&["export", "--extended-import"])]
    fn rejects_invalid_args(#[case] args: &[&str]) {
        parse(args).unwrap_err();
    }

    #[test]
    fn subcommand_names_are_only_special_in_first_position() {
        let options = parse(&["--durable-writes", "import"]).expect("parse options");
        assert_eq!(options.command, Command::Tui);
        assert_eq!(options.store_dir.as_deref(), Some("import"));
    }

    #[test]
    fn logging_defaults_to_warn_when_the_variable_is_unset() {
        let logger = logger_builder("CLASSFLOW_TEST_LOG_UNSET").build();
        assert_eq!(logger.filter(), log::LevelFilter::Warn);
    }

    #[rstest]
    #[case::debug("CLASSFLOW_TEST_LOG_DEBUG", "debug", log::LevelFilter::Debug)]
    #[case::error("CLASSFLOW_TEST_LOG_ERROR", "error", log::LevelFilter::Error)]
    #[case::off("CLASSFLOW_TEST_LOG_OFF", "off", log::LevelFilter::Off)]
    fn logging_follows_the_variable(
        #[case] var: &str,
        #[case] value: &str,
        #[case] expected: log::LevelFilter,
    ) {
        std::env::set_var(var, value);
        let logger = logger_builder(var).build();
        assert_eq!(logger.filter(), expected);
    }
}
