//! `artifacts apply`: create or update the artifact so it matches the local file.

use anyhow::{bail, Result};
use artifacts_core::client::Client;
use artifacts_core::resource;

use super::plan::{desired_config, prior_state, render_plan};
use crate::cli::UploadArgs;

/// Prints the plan, applies it, then prints the resulting state as JSON.
pub fn run_apply(client: &Client, args: &UploadArgs) -> Result<()> {
    let config = desired_config(args);
    let prior = prior_state(client, args)?;
    let plan = resource::diff(client, &config, prior.as_ref())?;
    print!("{}", render_plan(&config, prior.as_ref(), &plan));

    let state = match resource::apply_plan(client, &config, prior.as_ref(), &plan)? {
        Some(s) => s,
        None => bail!("no object at {} after upload", config.upload_path),
    };

    if state.sha1 != plan.planned_sha1 {
        tracing::warn!(
            remote = %state.sha1,
            local = %plan.planned_sha1,
            "remote checksum differs from local file"
        );
    }
    println!("{}", serde_json::to_string_pretty(&state)?);
    Ok(())
}
