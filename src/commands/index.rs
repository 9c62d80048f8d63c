use crate::cli::{IndexArgs, OutputFormat};
use crate::fs::{FileSystem, default_fs};
use crate::index::build_index;
use crate::style;

use super::CommandContext;

pub fn cmd_index(args: IndexArgs) -> i32 {
    let ctx = match CommandContext::new(&args.path) {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };
    run_index_with_fs(&ctx, &args, default_fs())
}

fn run_index_with_fs(ctx: &CommandContext, args: &IndexArgs, fs: &dyn FileSystem) -> i32 {
    let mut exclude = ctx.config.index.exclude_globs.clone();
    exclude.extend(args.exclude.iter().cloned());

    let index = build_index(fs, &ctx.path, &exclude);
    let stats = index.stats();

    match args.format {
        OutputFormat::Json => match serde_json::to_string_pretty(&stats) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                style::error(&format!("Failed to serialize stats: {}", e));
                return 1;
            }
        },
        OutputFormat::Text => println!("{}", style::stats_report(index.root(), &stats)),
    }

    if index.is_empty() {
        style::hint("No .ts, .tsx, .js, .jsx or .py files found; check exclude_globs in .codecanvas.toml");
    }
    0
}
