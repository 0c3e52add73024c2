use serde_json::Value;

use crate::cli::OutputFormat;

/// Output a success message in the appropriate format
pub fn output_success(output_format: OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let value = data.unwrap_or_else(|| serde_json::json!({ "message": message }));
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// One line per project: id, flags, order and title
pub fn output_projects(output_format: OutputFormat, projects: &Value) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(projects)?),
        OutputFormat::Text => {
            let items = projects.as_array().map(Vec::as_slice).unwrap_or_default();
            if items.is_empty() {
                println!("No projects found");
            }
            for project in items {
                println!("{}", project_line(project));
            }
        }
    }
    Ok(())
}

pub fn output_project(output_format: OutputFormat, project: &Value) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(project)?),
        OutputFormat::Text => {
            println!("{}", project_line(project));
            if let Some(description) = project.get("description").and_then(Value::as_str) {
                println!("  {}", description);
            }
            let tech = project
                .get("tech")
                .and_then(Value::as_array)
                .map(|t| t.iter().filter_map(Value::as_str).collect::<Vec<_>>().join(", "))
                .unwrap_or_default();
            if !tech.is_empty() {
                println!("  tech: {}", tech);
            }
            for (label, key) in [("github", "githubUrl"), ("demo", "demoUrl")] {
                if let Some(url) = project.get(key).and_then(Value::as_str).filter(|u| !u.is_empty()) {
                    println!("  {}: {}", label, url);
                }
            }
            if project.get("coverImage").is_some() {
                println!("  cover image: yes");
            }
        }
    }
    Ok(())
}

fn project_line(project: &Value) -> String {
    let text = |key: &str| project.get(key).and_then(Value::as_str).unwrap_or("").to_string();
    let featured = project.get("featured").and_then(Value::as_bool).unwrap_or(false);
    let order = project.get("order").and_then(Value::as_i64).unwrap_or(0);

    format!(
        "{} {} [{}] {}",
        text("id"),
        if featured { "★" } else { " " },
        order,
        text("title")
    )
}
