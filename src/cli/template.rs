//! Template command implementation.
//!
//! ```text
//! permaroute template /:year/:slug/ --field year=2015 --field slug=hello
//! permaroute template /:year/:slug/ --match /2015/hello/edit/
//! ```

use anyhow::Result;
use serde::Serialize;

use super::TemplateArgs;
use crate::log;
use crate::route::{Fields, PermalinkTemplate};

#[derive(Debug, Serialize)]
struct TemplateReport<'a> {
    template: &'a str,
    captures: Vec<&'a str>,
    date_fields: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generated: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    matched: Option<Option<Fields>>,
}

pub fn run_template(args: &TemplateArgs) -> Result<()> {
    let template = PermalinkTemplate::compile(&args.template)?;
    let report = build_report(&template, args)?;

    log!("template"; "{} ({} captures)", report.template, report.captures.len());
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn build_report<'a>(
    template: &'a PermalinkTemplate,
    args: &TemplateArgs,
) -> Result<TemplateReport<'a>> {
    let generated = if args.fields.is_empty() {
        None
    } else {
        let fields: Fields = args.fields.iter().cloned().collect();
        Some(template.pattern().generate(&fields)?.to_string())
    };

    Ok(TemplateReport {
        template: template.source(),
        captures: template.pattern().captures().collect(),
        date_fields: template.date_parts().iter().map(|part| part.field()).collect(),
        generated,
        matched: args.matches.as_deref().map(|path| template.match_path(path)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(fields: &[(&str, &str)], matches: Option<&str>) -> TemplateArgs {
        TemplateArgs {
            template: "/:year/:month/:slug/".into(),
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            matches: matches.map(str::to_string),
        }
    }

    #[test]
    fn test_report_generate_and_match() {
        let args = args(
            &[("year", "2015"), ("month", "03"), ("slug", "hi")],
            Some("/2015/03/hi/edit/"),
        );
        let template = PermalinkTemplate::compile(&args.template).unwrap();
        let report = build_report(&template, &args).unwrap();

        assert_eq!(report.captures, ["year", "month", "slug"]);
        assert_eq!(report.date_fields, ["year", "month"]);
        assert_eq!(report.generated.as_deref(), Some("/2015/03/hi/"));
        let matched = report.matched.flatten().unwrap();
        assert_eq!(matched["edit"], "edit");
    }

    #[test]
    fn test_report_missing_field() {
        let args = args(&[("year", "2015")], None);
        let template = PermalinkTemplate::compile(&args.template).unwrap();
        assert!(build_report(&template, &args).is_err());
    }

    #[test]
    fn test_run_template_invalid() {
        let mut bad = args(&[], None);
        bad.template = "/:a/:a/".into();
        assert!(run_template(&bad).is_err());
    }
}
