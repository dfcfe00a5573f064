use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::export::{ExportLogic, ExportRequest, RenderContext};
use crate::utils::path::resolve_output_dir;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        client_id,
        from,
        to,
        format,
        out,
        force,
    } = cmd
    {
        let request = ExportRequest {
            client_id: *client_id,
            start: from.clone(),
            end: to.clone(),
        };

        let ctx = RenderContext::from_config(cfg)?;
        let out_dir = resolve_output_dir(out.as_ref(), &cfg.export_dir);

        let pool = crate::db::open(&cfg.database)?;
        ExportLogic::export(&pool, &request, *format, &out_dir, *force, &ctx)?;
    }

    Ok(())
}
