use crate::cli::ServeArgs;
use crate::fs::RealFs;
use crate::session::Session;
use crate::style;
use crate::symbols::TreeSitterSymbols;
use std::sync::Arc;

use super::CommandContext;

pub fn cmd_serve(args: ServeArgs) -> i32 {
    let ctx = match CommandContext::new(&args.path) {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    let fs = Arc::new(RealFs);
    let symbols = Arc::new(TreeSitterSymbols::new(fs.clone()));
    let session = Session::new(Some(ctx.path.clone()), ctx.config, fs, symbols);

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            style::error(&format!("Failed to start async runtime: {}", e));
            return 1;
        }
    };

    if let Err(e) = rt.block_on(crate::server::serve(session, args.port, args.open)) {
        style::error(&format!("Server failed: {}", e));
        return 1;
    }

    0
}
