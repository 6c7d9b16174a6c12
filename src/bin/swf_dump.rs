//! Print the structure of a SWF file.
//!
//! Usage: swf_dump [--structure] [--raw] [--layers] [--failsafe] [--roundtrip] <file.swf>
//!
//! Set `RUST_LOG=debug` to see header and compression details.

use anyhow::{bail, Context};
use log::{info, warn};

use swfrust::{DumpFlags, SwfDocument, SwfReader, SwfReaderConfiguration};

fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("warn"));

    let mut flags = DumpFlags::empty();
    let mut config = SwfReaderConfiguration::default();
    let mut roundtrip = false;
    let mut path = None;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--structure" => flags |= DumpFlags::TIMELINE_STRUCTURE,
            "--raw" => flags |= DumpFlags::RAW_HEADERS,
            "--layers" => config.build_layers = true,
            "--failsafe" => config.failsafe = true,
            "--roundtrip" => roundtrip = true,
            other if other.starts_with("--") => bail!("unknown option {other}"),
            other => path = Some(other.to_string()),
        }
    }
    let Some(path) = path else {
        bail!("usage: swf_dump [--structure] [--raw] [--layers] [--failsafe] [--roundtrip] <file.swf>");
    };

    let mut doc = SwfReader::from_file(&path)
        .with_context(|| format!("opening {path}"))?
        .with_config(config)
        .read()
        .with_context(|| format!("reading {path}"))?;

    println!("{}", doc.dump(flags));
    for notification in &doc.notifications {
        println!("{notification}");
    }

    if roundtrip {
        let tags = doc.timeline.tag_count();
        let bytes = doc.publish().context("publishing")?;
        let reloaded = SwfDocument::load(&bytes).context("reloading published bytes")?;
        if reloaded.timeline.tag_count() == tags {
            info!("round trip ok: {tags} tags, {} bytes", bytes.len());
        } else {
            warn!(
                "round trip changed the tag count: {tags} -> {}",
                reloaded.timeline.tag_count()
            );
        }
    }
    Ok(())
}
