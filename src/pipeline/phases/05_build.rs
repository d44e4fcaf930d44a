use super::run_invocations;
use crate::config::PublishConfig;
use crate::error::PublishError;
use crate::layout::ProjectDescriptor;
use crate::pipeline::context::PublishContext;
use crate::pipeline::phase_trait::PublishPhase;
use crate::process::Invocation;
use anyhow::Result;
use async_trait::async_trait;

/// `dotnet build <project> -c <configuration>` for every build project
pub struct BuildPhase;

pub fn build_invocation(config: &PublishConfig, project: &ProjectDescriptor) -> Invocation {
    Invocation::new(&config.dotnet)
        .arg("build")
        .arg(project.project_file.to_string_lossy())
        .arg("-c")
        .arg(&config.configuration)
}

#[async_trait]
impl PublishPhase for BuildPhase {
    async fn execute(&self, context: &mut PublishContext) -> Result<()> {
        let projects = context.build_projects();

        let mut invocations = Vec::with_capacity(projects.len());
        for project in &projects {
            if !project.project_file.is_file() {
                return Err(PublishError::not_found(
                    &project.project_file,
                    "project file does not exist",
                )
                .into());
            }
            invocations.push((
                format!("Building '{}'...", project.project_file.display()),
                build_invocation(&context.config, project),
            ));
        }

        run_invocations(
            &context.runner,
            context.config.exit_code_policy,
            context.config.jobs,
            invocations,
        )
        .await?;

        context.report.built_projects = projects.into_iter().map(|p| p.name).collect();
        Ok(())
    }
}
