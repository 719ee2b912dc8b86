use crate::cli::args::CliArgs;
use crate::output::OutputFormat;

/// A scripted user action replayed against the session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    Click(String),
    Hash(String),
    Open(String),
    Back,
    HistoryBack,
    HistoryForward,
}

pub fn parse_step(raw: &str) -> Result<Step, String> {
    let raw = raw.trim();
    let (kind, arg) = match raw.split_once(':') {
        Some((kind, arg)) => (kind.trim(), Some(arg.trim())),
        None => (raw, None),
    };
    let required = |arg: Option<&str>| -> Result<String, String> {
        match arg.filter(|a| !a.is_empty()) {
            Some(a) => Ok(a.to_string()),
            None => Err(format!("step '{kind}' needs a value, e.g. {kind}:<value>")),
        }
    };
    match kind.to_lowercase().as_str() {
        "click" => Ok(Step::Click(required(arg)?)),
        "hash" => Ok(Step::Hash(required(arg)?)),
        "open" => Ok(Step::Open(required(arg)?)),
        "back" if arg.is_none() => Ok(Step::Back),
        "history-back" if arg.is_none() => Ok(Step::HistoryBack),
        "history-forward" if arg.is_none() => Ok(Step::HistoryForward),
        _ => Err(format!("unknown step '{raw}'")),
    }
}

pub fn parse_pages_csv(value: &str) -> Result<Vec<String>, String> {
    let pages: Vec<String> = value
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if pages.is_empty() {
        return Err("pages list is empty".to_string());
    }
    Ok(pages)
}

pub fn validate(args: &CliArgs) -> Result<(), String> {
    for raw in args.steps.iter() {
        parse_step(raw).map_err(|e| format!("invalid --step '{raw}': {e}"))?;
    }
    if let Some(raw) = args.output_format.as_deref() {
        if OutputFormat::parse(raw).is_none() {
            return Err(format!(
                "invalid --output-format '{raw}', expected text, json or html"
            ));
        }
    }
    if let Some(raw) = args.pages.as_deref() {
        parse_pages_csv(raw).map_err(|e| format!("invalid --pages '{raw}': {e}"))?;
    }
    if args.timeout == Some(0) {
        return Err("invalid timeout, expected positive integer".to_string());
    }
    if let Some(param) = args.person_param.as_deref() {
        if param.trim().is_empty() {
            return Err("invalid --person-param, expected a name".to_string());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn steps_parse() {
        assert_eq!(
            parse_step("click:people"),
            Ok(Step::Click("people".to_string()))
        );
        assert_eq!(
            parse_step(" open: Ada Lovelace "),
            Ok(Step::Open("Ada Lovelace".to_string()))
        );
        assert_eq!(parse_step("back"), Ok(Step::Back));
        assert_eq!(parse_step("HISTORY-BACK"), Ok(Step::HistoryBack));
        assert_eq!(parse_step("history-forward"), Ok(Step::HistoryForward));
        assert!(parse_step("open:").is_err());
        assert!(parse_step("back:now").is_err());
        assert!(parse_step("jump").is_err());
    }

    #[test]
    fn pages_csv_parses() {
        assert_eq!(
            parse_pages_csv("home, people,,"),
            Ok(vec!["home".to_string(), "people".to_string()])
        );
        assert!(parse_pages_csv(" , ").is_err());
    }

    #[test]
    fn validate_rejects_bad_args() {
        let args = CliArgs::parse_from(["recordbook", "--step", "fly"]);
        assert!(validate(&args).is_err());
        let args = CliArgs::parse_from(["recordbook", "--of", "xml"]);
        assert!(validate(&args).is_err());
        let args = CliArgs::parse_from(["recordbook", "--timeout", "0"]);
        assert!(validate(&args).is_err());
        let args = CliArgs::parse_from(["recordbook", "--step", "open:Ada", "--of", "json"]);
        assert!(validate(&args).is_ok());
    }
}
