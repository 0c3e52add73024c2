use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Args, Subcommand};
use reqwest::multipart::{Form, Part};

use crate::cli::client::ApiClient;
use crate::cli::utils::{output_project, output_projects, output_success};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum ProjectCommands {
    #[command(about = "List projects in display order")]
    List {
        #[arg(long, help = "Case-insensitive search text")]
        q: Option<String>,
    },

    #[command(about = "Show one project")]
    Get {
        #[arg(help = "Project ID")]
        id: String,
    },

    #[command(about = "Create a project")]
    Create {
        #[command(flatten)]
        fields: ProjectArgs,
        #[arg(long, env = "FOLIO_TOKEN", hide_env_values = true, help = "Bearer token")]
        token: String,
    },

    #[command(about = "Change only the given fields of a project")]
    Update {
        #[arg(help = "Project ID")]
        id: String,
        #[command(flatten)]
        fields: ProjectArgs,
        #[arg(long, env = "FOLIO_TOKEN", hide_env_values = true, help = "Bearer token")]
        token: String,
    },

    #[command(about = "Delete a project")]
    Delete {
        #[arg(help = "Project ID")]
        id: String,
        #[arg(long, env = "FOLIO_TOKEN", hide_env_values = true, help = "Bearer token")]
        token: String,
    },
}

#[derive(Args, Debug, Default)]
pub struct ProjectArgs {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long, help = "Comma-separated technologies")]
    pub tech: Option<String>,
    #[arg(long)]
    pub github_url: Option<String>,
    #[arg(long)]
    pub demo_url: Option<String>,
    #[arg(long)]
    pub featured: Option<bool>,
    #[arg(long)]
    pub order: Option<i64>,
    #[arg(long, help = "Cover image file (.jpg, .png or .webp)")]
    pub image: Option<PathBuf>,
}

impl ProjectArgs {
    /// Multipart body carrying only the fields that were given
    pub fn into_form(self) -> anyhow::Result<Form> {
        let mut form = Form::new();
        let text_fields = [
            ("title", self.title),
            ("description", self.description),
            ("tech", self.tech),
            ("githubUrl", self.github_url),
            ("demoUrl", self.demo_url),
            ("featured", self.featured.map(|f| f.to_string())),
            ("order", self.order.map(|o| o.to_string())),
        ];
        for (name, value) in text_fields {
            if let Some(value) = value {
                form = form.text(name, value);
            }
        }

        if let Some(path) = self.image {
            form = form.part("image", image_part(&path)?);
        }
        Ok(form)
    }
}

fn image_mime(path: &Path) -> anyhow::Result<&'static str> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => Ok("image/jpeg"),
        "png" => Ok("image/png"),
        "webp" => Ok("image/webp"),
        other => bail!("unsupported image extension '{}'; use .jpg, .png or .webp", other),
    }
}

fn image_part(path: &Path) -> anyhow::Result<Part> {
    let mime = image_mime(path)?;
    let bytes = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("image")
        .to_string();

    Ok(Part::bytes(bytes).file_name(file_name).mime_str(mime)?)
}

pub async fn handle(cmd: ProjectCommands, url: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    let client = ApiClient::new(url)?;

    match cmd {
        ProjectCommands::List { q } => {
            let projects = client.list(q.as_deref()).await?;
            output_projects(output_format, &projects)
        }
        ProjectCommands::Get { id } => {
            let project = client.get(&id).await?;
            output_project(output_format, &project)
        }
        ProjectCommands::Create { fields, token } => {
            let project = client.create(&token, fields.into_form()?).await?;
            output_project(output_format, &project)
        }
        ProjectCommands::Update { id, fields, token } => {
            let project = client.update(&token, &id, fields.into_form()?).await?;
            output_project(output_format, &project)
        }
        ProjectCommands::Delete { id, token } => {
            let body = client.delete(&token, &id).await?;
            output_success(output_format, &format!("Deleted project {}", id), Some(body))
        }
    }
}
