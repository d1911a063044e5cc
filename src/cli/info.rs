use std::path::Path;

use anyhow::{Result, bail};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use super::command::{Cli, InfoArgs, ReportFormat};
use crate::input::InputSource;
use crate::report::Report;
use crate::timestamp::duration_str;
use flaccid::process::{ParsePolicy, parse::Parser};
use flaccid::structs::block::{BlockPayload, MetadataBlock};
use flaccid::structs::container::Container;
use flaccid::structs::frame::FrameHeaderRaw;
use flaccid::structs::seek_table::SeekTable;
use flaccid::structs::stream_info::StreamInfo;
use flaccid::structs::vorbis_comment::VorbisComment;

pub fn cmd_info(args: &InfoArgs, cli: &Cli, multi: Option<&MultiProgress>) -> Result<()> {
    let policy = cli.parse_policy();
    let parser = Parser::with_policy(policy);

    let pb = match multi {
        Some(multi) => {
            let pb = multi.add(ProgressBar::new(args.inputs.len() as u64));
            pb.set_style(ProgressStyle::with_template(
                "{spinner:.green} [{bar:30}] {pos}/{len} {msg}",
            )?);
            Some(pb)
        }
        None => None,
    };

    let mut report = Report::default();
    let mut failures = 0usize;

    for input in &args.inputs {
        if let Some(ref pb) = pb {
            pb.set_message(input.display().to_string());
        }

        log::info!("Inspecting FLAC stream: {}", input.display());
        let result = parse_input(&parser, input);

        if let Err(ref e) = result {
            if policy == ParsePolicy::Strict {
                if let Some(ref pb) = pb {
                    pb.abandon();
                }
                return Err(anyhow::anyhow!("{}: {e:#}", input.display()));
            }
            log::error!("{}: {e:#}", input.display());
            failures += 1;
        }

        match args.report {
            ReportFormat::Text => {
                if let Ok(ref container) = result {
                    print_suspended(pb.as_ref(), || display_container(input, container));
                }
            }
            ReportFormat::Yaml => report.push(input.display().to_string(), &result),
        }

        if let Some(ref pb) = pb {
            pb.inc(1);
        }
    }

    if let Some(ref pb) = pb {
        pb.finish_and_clear();
    }

    if args.report == ReportFormat::Yaml {
        print!("{}", report.to_yaml()?);
    }

    if failures > 0 {
        bail!("{failures} of {} inputs could not be parsed", args.inputs.len());
    }

    Ok(())
}

fn parse_input(parser: &Parser, input: &Path) -> Result<Container> {
    let source = InputSource::open(input)?;
    if let Some(size) = source.byte_len() {
        log::debug!("{}: {size} bytes", input.display());
    }
    parser.parse(source)
}

/// Keeps stdout output from being overdrawn by the progress bar.
fn print_suspended<F: FnOnce()>(pb: Option<&ProgressBar>, f: F) {
    match pb {
        Some(pb) => pb.suspend(f),
        None => f(),
    }
}

fn display_container(input: &Path, container: &Container) {
    let title = format!("FLAC Stream: {}", input.display());
    println!();
    println!("{title}");
    println!("{}", "=".repeat(title.chars().count()));
    println!();

    display_blocks(container.blocks());

    if let Some(stream_info) = container.stream_info() {
        display_stream_info(stream_info);
    }

    if let Some(seek_table) = container.seek_table() {
        display_seek_table(seek_table);
    }

    if let Some(vorbis_comment) = container.vorbis_comment() {
        display_vorbis_comment(vorbis_comment);
    }

    display_frame_header(container.frame_header());
}

fn display_blocks(blocks: &[MetadataBlock]) {
    println!("Metadata Blocks");
    for (index, block) in blocks.iter().enumerate() {
        let mut line = format!(
            "  #{index:<3} {:16} {:>8} bytes",
            block.header.block_type.to_string(),
            block.header.length
        );
        if matches!(block.payload, BlockPayload::Unknown(_)) {
            line.push_str("  (not decoded)");
        }
        if block.header.is_last {
            line.push_str("  (last)");
        }
        println!("{line}");
    }
    println!();
}

fn display_stream_info(info: &StreamInfo) {
    println!("Stream Information");
    println!(
        "  Block size                {}-{} samples",
        info.min_block_size, info.max_block_size
    );
    println!(
        "  Frame size                {}-{} bytes",
        info.min_frame_size, info.max_frame_size
    );
    println!("  Sample rate               {} Hz", info.sample_rate);
    println!("  Channels                  {}", info.channels());
    println!("  Bits per sample           {}", info.bits_per_sample());
    println!("  Total samples             {}", info.total_samples);
    match info.duration_secs() {
        Some(secs) => println!("  Duration                  {}", duration_str(secs)),
        None => println!("  Duration                  unknown"),
    }
    println!("  MD5 signature             {}", info.md5_hex());
    println!();
}

fn display_seek_table(table: &SeekTable) {
    println!("Seek Table ({} points)", table.points.len());
    for (index, point) in table.points.iter().enumerate() {
        if point.is_placeholder() {
            println!("  #{index:<3} placeholder");
            continue;
        }
        println!(
            "  #{index:<3} sample {:>12}  offset {:>10}  samples {:>5}",
            point.sample_number, point.byte_offset, point.frame_samples
        );
    }
    println!();
}

fn display_vorbis_comment(comment: &VorbisComment) {
    println!("Vorbis Comments");
    println!("  Vendor                    {}", comment.vendor);
    for (index, entry) in comment.comments.iter().enumerate() {
        println!("  #{index:<3} {entry}");
    }
    println!();
}

fn display_frame_header(header: &FrameHeaderRaw) {
    let strategy = if header.is_variable_blocksize() {
        "variable"
    } else {
        "fixed"
    };

    println!("First Frame Header");
    println!("  Blocking strategy         {strategy}");
    println!("  Block size code           {}", header.block_size);
    println!("  Sample rate code          {}", header.sample_rate);
    println!("  Channel assignment code   {}", header.channel);
    println!("  Sample size code          {}", header.sample_size);
    println!();
}
