use std::io::{IsTerminal, Read};
use std::path::PathBuf;
use std::process::Command;

use anyhow::{bail, Context, Result};
use clap::Args;
use tracing::debug;

use mnemon_core::ledger::NewIntent;
use mnemon_core::model::Meta;

use crate::backend::open_ledger;
use crate::config::Config;
use crate::state::save_last_hash;

#[derive(Args)]
pub struct CaptureArgs {
    /// Author of the captured exchange
    #[arg(long)]
    pub author: String,

    /// File holding the response text
    #[arg(long)]
    pub response_file: PathBuf,

    /// File holding the prompt text (otherwise stdin or --edit)
    #[arg(long)]
    pub prompt_file: Option<PathBuf>,

    /// Optional title
    #[arg(long)]
    pub title: Option<String>,

    /// Source type
    #[arg(long, default_value = "cli")]
    pub source: String,

    /// Hash of the previous intent in the chain
    #[arg(long)]
    pub prev_hash: Option<String>,

    /// Compose the prompt in $EDITOR
    #[arg(long)]
    pub edit: bool,

    /// Meta key=value (repeatable)
    #[arg(long = "meta", value_name = "KEY=VALUE")]
    pub meta: Vec<String>,
}

pub fn run(args: &CaptureArgs) -> Result<()> {
    if args.author.trim().is_empty() {
        bail!("--author is required");
    }

    let stdin_has_data = !std::io::stdin().is_terminal();
    if args.edit {
        if args.prompt_file.is_some() {
            bail!("--edit cannot be used with --prompt-file");
        }
        if stdin_has_data {
            bail!("--edit cannot be used with stdin");
        }
    }

    let prompt = if args.edit {
        read_prompt_from_editor()?
    } else if let Some(path) = &args.prompt_file {
        std::fs::read_to_string(path)
            .with_context(|| format!("read prompt file: {}", path.display()))?
    } else if stdin_has_data {
        let text = read_prompt_from_stdin()?;
        if text.trim().is_empty() {
            bail!("prompt must be provided via --prompt-file, stdin, or --edit");
        }
        text
    } else {
        bail!("prompt must be provided via --prompt-file, stdin, or --edit");
    };

    let response = std::fs::read_to_string(&args.response_file)
        .with_context(|| format!("read response file: {}", args.response_file.display()))?;

    let meta = parse_meta_pairs(&args.meta)?;

    let cfg = Config::load()?;
    let ledger = open_ledger(&cfg)?;
    let intent = ledger.create_intent(NewIntent {
        author: args.author.clone(),
        source_type: args.source.clone(),
        title: args.title.clone(),
        prompt,
        response,
        meta,
        prev_hash: args.prev_hash.clone(),
    })?;

    debug!("captured intent {} ({})", intent.id, intent.hash);
    println!("id: {}", intent.id);
    println!("hash: {}", intent.hash);

    save_last_hash(&intent.hash)?;
    Ok(())
}

pub fn parse_meta_pairs(pairs: &[String]) -> Result<Option<Meta>> {
    if pairs.is_empty() {
        return Ok(None);
    }
    let mut meta = Meta::new();
    for pair in pairs {
        match pair.split_once('=') {
            Some((key, value)) if !key.is_empty() => {
                meta.insert(key.to_string(), value.to_string());
            }
            _ => bail!("invalid meta value: {pair} (expected key=value)"),
        }
    }
    Ok(Some(meta))
}

fn read_prompt_from_stdin() -> Result<String> {
    let mut data = String::new();
    std::io::stdin()
        .read_to_string(&mut data)
        .context("read stdin")?;
    Ok(data.trim_end().to_string())
}

fn read_prompt_from_editor() -> Result<String> {
    let editor = std::env::var("EDITOR").unwrap_or_default();
    let editor = editor.trim();
    if editor.is_empty() {
        bail!("$EDITOR is not set");
    }

    let tmp = tempfile::Builder::new()
        .prefix("mnemon-prompt-")
        .suffix(".txt")
        .tempfile()
        .context("create temp file")?;
    let path = tmp.path().to_path_buf();

    let mut fields = editor.split_whitespace();
    let program = fields.next().context("invalid $EDITOR value")?;
    let status = Command::new(program)
        .args(fields)
        .arg(&path)
        .status()
        .context("run editor")?;
    if !status.success() {
        bail!("editor exited with {status}");
    }

    std::fs::read_to_string(&path).context("read temp file")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_pairs_parse() {
        let meta = parse_meta_pairs(&["project=alpha".into(), "tag=a=b".into()])
            .unwrap()
            .unwrap();
        assert_eq!(meta.get("project").map(String::as_str), Some("alpha"));
        // Only the first '=' splits; the rest belongs to the value.
        assert_eq!(meta.get("tag").map(String::as_str), Some("a=b"));
    }

    #[test]
    fn test_meta_pairs_reject_malformed() {
        assert!(parse_meta_pairs(&["no-equals".into()]).is_err());
        assert!(parse_meta_pairs(&["=value".into()]).is_err());
    }

    #[test]
    fn test_no_meta_is_none() {
        assert!(parse_meta_pairs(&[]).unwrap().is_none());
    }
}
