//! `pgraph` — proof-block graph command-line interface.
//!
//! Subcommands for working with editor snapshots on the command line:
//!
//! - **`validate`** — check every block is ready to save.
//! - **`order`** — print the canonical sequence.
//! - **`render`** — print a human-readable view of the sequence.
//! - **`digest`** — print the SHA-256 digest of the sequence.
//! - **`link`** — chain the sequence, lay it out on one row, print the result.
//! - **`new`** — create a new block with an auto-generated id and timestamp.
//!
//! Input is a snapshot JSON object or a plain array of blocks, read from a
//! file path or from stdin (`-`).

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use proofgraph::render::{render_block, render_sequence, render_summary};
use proofgraph::{
    validate_block, BlockContent, BlockDraft, BlockType, EditorConfig, EditorSnapshot,
    EditorStore, MediaContent, ProofBlock, ReferenceRecord,
};
use serde::Deserialize;

/// pgraph — proof-block graph CLI
///
/// Validate, order, render and hash proof-block snapshots.
#[derive(Parser)]
#[command(name = "pgraph", version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    #[command(subcommand)]
    command: Command,
}

/// Overrides for [`EditorConfig`]. Flags win over the environment.
#[derive(Args)]
struct ConfigArgs {
    /// x of the first block in the inline layout.
    #[arg(long, global = true, env = "PGRAPH_LAYOUT_X", value_name = "FLOAT")]
    layout_x: Option<f64>,

    /// y of the inline layout row.
    #[arg(long, global = true, env = "PGRAPH_LAYOUT_Y", value_name = "FLOAT")]
    layout_y: Option<f64>,

    /// Horizontal spacing between blocks in the inline layout.
    #[arg(long, global = true, env = "PGRAPH_LAYOUT_SPACING", value_name = "FLOAT")]
    spacing: Option<f64>,

    /// Suffix appended to duplicated titles.
    #[arg(long, global = true, env = "PGRAPH_COPY_SUFFIX", value_name = "TEXT")]
    copy_suffix: Option<String>,

    /// Trimmed title length the audit preview approves.
    #[arg(long, global = true, env = "PGRAPH_AUDIT_MIN_TITLE", value_name = "N")]
    audit_min_title: Option<usize>,
}

impl ConfigArgs {
    fn into_config(self) -> EditorConfig {
        let mut config = EditorConfig::from_env();
        if let Some(x) = self.layout_x {
            config.layout.origin.x = x;
        }
        if let Some(y) = self.layout_y {
            config.layout.origin.y = y;
        }
        if let Some(spacing) = self.spacing {
            config.layout.spacing = spacing;
        }
        if let Some(suffix) = self.copy_suffix {
            config.copy_suffix = suffix;
        }
        if let Some(n) = self.audit_min_title {
            config.min_audit_title_len = n;
        }
        config
    }
}

#[derive(Subcommand)]
enum Command {
    /// Validate every block in a snapshot.
    ///
    /// Exits 0 if all blocks are valid, 1 otherwise.
    ///
    /// Pass `-` as FILE to read from stdin.
    Validate {
        /// Path to a JSON file, or `-` for stdin.
        file: PathBuf,
    },

    /// Print the canonical sequence, one id per line.
    Order {
        /// Path to a JSON file, or `-` for stdin.
        file: PathBuf,

        /// Print the ordered blocks as a JSON array instead of ids.
        #[arg(long)]
        json: bool,
    },

    /// Render the canonical sequence as human-readable text.
    Render {
        /// Path to a JSON file, or `-` for stdin.
        file: PathBuf,

        /// Also print every block in full, in sequence order.
        #[arg(long)]
        detail: bool,
    },

    /// Print the SHA-256 digest of the canonical sequence.
    Digest {
        /// Path to a JSON file, or `-` for stdin.
        file: PathBuf,
    },

    /// Link consecutive blocks, lay the sequence out on one row, and print
    /// the resulting snapshot as JSON.
    Link {
        /// Path to a JSON file, or `-` for stdin.
        file: PathBuf,
    },

    /// Create a new block and print it as JSON.
    ///
    /// Examples:
    ///   pgraph new -t text --title "Intro" --markdown "# Setup"
    ///   pgraph new -t reference --title "Sources" \
    ///     --author "Turing, A." --source-title "On Computable Numbers" --year 1936
    New {
        /// Block type: text | image | video | audio | reference
        #[arg(short = 't', long = "type", value_name = "TYPE")]
        block_type: BlockType,

        #[arg(long, value_name = "TEXT")]
        title: String,

        #[arg(short = 'd', long, value_name = "TEXT")]
        description: Option<String>,

        /// Markdown body (text blocks).
        #[arg(long, value_name = "TEXT")]
        markdown: Option<String>,

        /// Media URL (image, video and audio blocks).
        #[arg(long, value_name = "URL")]
        url: Option<String>,

        /// Mark the media as a screen capture.
        #[arg(long)]
        screen_capture: bool,

        /// Reference author.
        #[arg(long, value_name = "TEXT")]
        author: Option<String>,

        /// Title of the referenced work.
        #[arg(long, value_name = "TEXT")]
        source_title: Option<String>,

        /// Reference year.
        #[arg(long, value_name = "YEAR")]
        year: Option<String>,

        #[arg(long, value_name = "URL")]
        link: Option<String>,

        #[arg(long, value_name = "DOI")]
        doi: Option<String>,
    },
}

/// Accepted input shapes.
#[derive(Deserialize)]
#[serde(untagged)]
enum Input {
    Blocks(Vec<ProofBlock>),
    Snapshot(EditorSnapshot),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "proofgraph=warn,pgraph=warn".into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config.into_config();

    match cli.command {
        Command::Validate { file } => {
            let snapshot = read_snapshot(&file);
            if snapshot.blocks.is_empty() {
                fatal("input contains no blocks");
            }
            let total = snapshot.blocks.len();
            let mut all_valid = true;
            for block in &snapshot.blocks {
                if let Err(e) = validate_block(block) {
                    eprintln!("error in block {}: {}", block.id, e);
                    all_valid = false;
                }
            }
            if !all_valid {
                process::exit(1);
            }
            if total == 1 {
                println!("valid");
            } else {
                println!("all {} blocks valid", total);
            }
        }

        Command::Order { file, json } => {
            let store = load_store(&file, config);
            if json {
                let blocks: Vec<&ProofBlock> = store.ordered_blocks();
                println!("{}", to_json(&blocks));
            } else {
                for id in store.ordered_ids() {
                    println!("{}", id);
                }
            }
        }

        Command::Render { file, detail } => {
            let store = load_store(&file, config);
            let ordered = store.ordered_blocks();
            print!("{}", render_sequence(&ordered));
            if detail {
                for block in &ordered {
                    println!();
                    print!("{}", render_block(block));
                }
            } else {
                println!();
                print!("{}", render_summary(store.registry()));
            }
        }

        Command::Digest { file } => {
            let store = load_store(&file, config);
            let digest = store
                .sequence_digest()
                .unwrap_or_else(|e| fatal(&e.to_string()));
            println!("{}", digest);
        }

        Command::Link { file } => {
            let mut store = load_store(&file, config);
            let added = store.link_sequentially();
            store.apply_inline_layout();
            tracing::info!(added, "sequence linked");
            println!("{}", to_json(&store.snapshot()));
        }

        Command::New {
            block_type,
            title,
            description,
            markdown,
            url,
            screen_capture,
            author,
            source_title,
            year,
            link,
            doi,
        } => {
            let content = match block_type {
                BlockType::Text => BlockContent::Text {
                    markdown: markdown.unwrap_or_default(),
                },
                BlockType::Image | BlockType::Video | BlockType::Audio => {
                    let media = MediaContent {
                        url,
                        is_screen_capture: screen_capture.then_some(true),
                    };
                    match block_type {
                        BlockType::Image => BlockContent::Image(media),
                        BlockType::Video => BlockContent::Video(media),
                        _ => BlockContent::Audio(media),
                    }
                }
                BlockType::Reference => BlockContent::Reference {
                    reference: Some(ReferenceRecord {
                        author: author.unwrap_or_default(),
                        title: source_title.unwrap_or_default(),
                        year: year.unwrap_or_default(),
                        link,
                        doi,
                    }),
                },
            };

            let mut store = EditorStore::with_config(config);
            let draft = BlockDraft {
                title: Some(title),
                description,
                content: Some(content),
                ..BlockDraft::default()
            };
            let block = store
                .add_block(block_type, None, Some(draft))
                .unwrap_or_else(|e| fatal(&e.to_string()));

            if let Err(e) = validate_block(&block) {
                fatal(&format!("block is invalid: {}", e));
            }

            println!("{}", to_json(&block));
        }
    }
}

/// Read the full contents of a file, or stdin when the path is `"-"`.
fn read_input(path: &PathBuf) -> String {
    if path.to_str() == Some("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .unwrap_or_else(|e| fatal(&format!("failed to read stdin: {}", e)));
        buf
    } else {
        fs::read_to_string(path).unwrap_or_else(|e| {
            fatal(&format!("failed to read {}: {}", path.display(), e))
        })
    }
}

/// Parse the input as either an array of blocks or a full snapshot.
fn read_snapshot(path: &PathBuf) -> EditorSnapshot {
    let json = read_input(path);
    match serde_json::from_str::<Input>(&json) {
        Ok(Input::Blocks(blocks)) => EditorSnapshot {
            blocks,
            ..EditorSnapshot::default()
        },
        Ok(Input::Snapshot(snapshot)) => snapshot,
        Err(e) => fatal(&format!(
            "failed to parse input as a snapshot or block array: {}",
            e
        )),
    }
}

/// Load a snapshot into a fresh store. Refused blocks and edges are reported
/// on stderr but are not fatal.
fn load_store(path: &PathBuf, config: EditorConfig) -> EditorStore {
    let snapshot = read_snapshot(path);
    let mut store = EditorStore::with_config(config);
    let report = store.restore(snapshot);
    for rejected in &report.rejected {
        eprintln!("warning: {}", rejected);
    }
    store
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| fatal(&format!("failed to serialise output: {}", e)))
}

/// Print an error message to stderr and exit with code 2.
fn fatal(msg: &str) -> ! {
    eprintln!("pgraph: {}", msg);
    process::exit(2);
}
