use anyhow::Result;

use super::command::{Cli, TagsArgs};
use crate::input::InputSource;
use flaccid::process::parse::Parser;
use flaccid::structs::vorbis_comment::VorbisComment;

pub fn cmd_tags(args: &TagsArgs, cli: &Cli) -> Result<()> {
    let source = InputSource::open(&args.input)?;
    let container = Parser::with_policy(cli.parse_policy()).parse(source)?;

    let Some(comment) = container.vorbis_comment() else {
        log::warn!("{}: no VORBIS_COMMENT block", args.input.display());
        return Ok(());
    };

    for line in tag_lines(comment, args.field.as_deref()) {
        println!("{line}");
    }

    Ok(())
}

/// Comments in stored order, optionally restricted to one field name.
fn tag_lines(comment: &VorbisComment, field: Option<&str>) -> Vec<String> {
    match field {
        Some(name) => comment
            .matching(name)
            .map(|(key, value)| format!("{key}={value}"))
            .collect(),
        None => comment.comments.clone(),
    }
}
