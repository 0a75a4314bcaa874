use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::services::ReplacementPolicy;

#[derive(Parser, Debug, Clone)]
#[command(name = "doc_toolbox", about = "文档标点替换与字幕批量下载")]
pub struct CliArgs {
    /// TOML config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Upload documents and strip punctuation on the server
    Replace {
        /// pause | all
        #[arg(long, default_value = "pause", value_parser = parse_policy)]
        policy: ReplacementPolicy,

        /// Keep results in memory instead of saving them
        #[arg(long)]
        no_auto_download: bool,

        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Fetch subtitles for a batch of YouTube URLs
    Subtitles {
        /// Return a single Word document instead of text
        #[arg(long)]
        word: bool,

        /// Read URLs from a file, one per line
        #[arg(long)]
        urls_file: Option<PathBuf>,

        urls: Vec<String>,
    },
}

fn parse_policy(value: &str) -> Result<ReplacementPolicy, String> {
    value.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_replace_command() {
        let args =
            CliArgs::try_parse_from(["doc_toolbox", "replace", "--policy", "all", "a.docx"])
                .unwrap();
        match args.command {
            Command::Replace {
                policy,
                no_auto_download,
                files,
            } => {
                assert_eq!(policy, ReplacementPolicy::AllPunctuation);
                assert!(!no_auto_download);
                assert_eq!(files, vec![PathBuf::from("a.docx")]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_replace_requires_files() {
        assert!(CliArgs::try_parse_from(["doc_toolbox", "replace"]).is_err());
        assert!(
            CliArgs::try_parse_from(["doc_toolbox", "replace", "--policy", "bogus", "a.docx"])
                .is_err()
        );
    }
}
