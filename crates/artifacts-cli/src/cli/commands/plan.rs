//! `artifacts plan`: diff the desired upload against what the service holds.

use anyhow::Result;
use artifacts_core::client::Client;
use artifacts_core::resource::{
    self, PlanAction, UploadConfig, UploadPlan, UploadState, SHA1_KEY, UPLOAD_FILE_KEY,
    UPLOAD_PATH_KEY, UPLOAD_RESOURCE,
};

use crate::cli::UploadArgs;

pub(crate) fn desired_config(args: &UploadArgs) -> UploadConfig {
    let mut config = UploadConfig::new(args.upload_path.clone(), args.upload_file.clone());
    config.delete_old_path = !args.keep_old_path;
    config
}

/// Prior state read back from the service at `--prior-path` (or the upload path).
///
/// `None` when nothing is stored there, so the plan becomes a create.
pub(crate) fn prior_state(client: &Client, args: &UploadArgs) -> Result<Option<UploadState>> {
    let mut probe = UploadState::from_config(&desired_config(args));
    if let Some(prior) = &args.prior_path {
        probe.upload_path = prior.clone();
    }
    resource::read(client, &probe)
}

pub(crate) fn render_plan(
    config: &UploadConfig,
    prior: Option<&UploadState>,
    plan: &UploadPlan,
) -> String {
    let action = match plan.action {
        PlanAction::Create => "create",
        PlanAction::Update => "update",
        PlanAction::NoOp => "no changes",
    };
    let path = match prior {
        Some(p) if plan.path_changed => format!("{} -> {}", p.upload_path, config.upload_path),
        _ => config.upload_path.clone(),
    };
    let mut out = format!("{}: {}\n", UPLOAD_RESOURCE, action);
    out.push_str(&format!("  {}: {}\n", UPLOAD_PATH_KEY, path));
    out.push_str(&format!("  {}: {}\n", UPLOAD_FILE_KEY, config.upload_file.display()));
    match prior {
        Some(p) if p.sha1 != plan.planned_sha1 => {
            out.push_str(&format!("  {}: {} -> {}\n", SHA1_KEY, p.sha1, plan.planned_sha1));
        }
        _ => out.push_str(&format!("  {}: {}\n", SHA1_KEY, plan.planned_sha1)),
    }
    if plan.path_changed {
        let fate = if config.delete_old_path {
            "deleted"
        } else {
            "orphaned"
        };
        if let Some(p) = prior {
            out.push_str(&format!("  old path {} will be {}\n", p.upload_path, fate));
        }
    }
    out
}

pub fn run_plan(client: &Client, args: &UploadArgs) -> Result<()> {
    let config = desired_config(args);
    let prior = prior_state(client, args)?;
    let plan = resource::diff(client, &config, prior.as_ref())?;
    print!("{}", render_plan(&config, prior.as_ref(), &plan));
    Ok(())
}
