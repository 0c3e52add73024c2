use std::fmt;

use serde::Serialize;
use serde_json::Value;

use super::form::ProjectFields;
use super::normalize::normalize_tech;

pub const TITLE: &str = "title";
pub const DESCRIPTION: &str = "description";
pub const TECH: &str = "tech";
pub const GITHUB_URL: &str = "githubUrl";
pub const DEMO_URL: &str = "demoUrl";
pub const FEATURED: &str = "featured";
pub const ORDER: &str = "order";

/// One problem with one request field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Every violation found in a request, in rule order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Violations(Vec<FieldViolation>);

impl Violations {
    pub fn push(&mut self, violation: FieldViolation) {
        self.0.push(violation);
    }

    pub fn extend(&mut self, other: Violations) {
        self.0.extend(other.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldViolation> {
        self.0.iter()
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.0.iter().any(|v| v.field == field)
    }

    pub fn into_vec(self) -> Vec<FieldViolation> {
        self.0
    }

    /// `Ok(())` when nothing was collected
    pub fn into_result(self) -> Result<(), Violations> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<FieldViolation> for Violations {
    fn from(violation: FieldViolation) -> Self {
        Self(vec![violation])
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|v| format!("{}: {}", v.field, v.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// String whose trimmed length (in characters) lies within the bounds
    Text { min: usize, max: usize },
    /// Empty string or an absolute http(s) URL
    Url,
    Integer,
    Boolean,
    /// List or comma-separated string
    TechList,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Required,
    Optional,
}

/// What to do with a present value that cannot be read as the rule's kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrongType {
    Reject,
    Ignore,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: &'static str,
    pub kind: FieldKind,
    pub presence: Presence,
    pub wrong_type: WrongType,
}

const TITLE_KIND: FieldKind = FieldKind::Text { min: 2, max: 120 };
const DESCRIPTION_KIND: FieldKind = FieldKind::Text { min: 10, max: 3000 };

impl FieldRule {
    const fn create(field: &'static str, kind: FieldKind, presence: Presence) -> Self {
        Self {
            field,
            kind,
            presence,
            wrong_type: WrongType::Reject,
        }
    }

    const fn update(field: &'static str, kind: FieldKind) -> Self {
        Self {
            field,
            kind,
            presence: Presence::Optional,
            wrong_type: WrongType::Ignore,
        }
    }

    pub fn check(&self, value: Option<&Value>) -> Result<(), FieldViolation> {
        let Some(value) = value else {
            return match self.presence {
                Presence::Required => Err(self.violation(format!("{} is required", self.field))),
                Presence::Optional => Ok(()),
            };
        };

        match self.kind {
            FieldKind::Text { min, max } => match coerce_text(value) {
                Some(text) => {
                    let len = text.trim().chars().count();
                    if len < min || len > max {
                        Err(self.violation(format!(
                            "{} must be between {} and {} characters",
                            self.field, min, max
                        )))
                    } else {
                        Ok(())
                    }
                }
                None => self.wrong_type(format!("{} must be a string", self.field)),
            },
            FieldKind::Url => match coerce_text(value) {
                Some(text) if is_valid_url(text) => Ok(()),
                Some(_) => Err(self.violation(format!("{} must be a valid URL", self.field))),
                None => self.wrong_type(format!("{} must be a string", self.field)),
            },
            FieldKind::Integer => match coerce_integer(value) {
                Some(_) => Ok(()),
                None => self.wrong_type(format!("{} must be an integer", self.field)),
            },
            FieldKind::Boolean => match coerce_boolean(value) {
                Some(_) => Ok(()),
                None => self.wrong_type(format!("{} must be a boolean", self.field)),
            },
            FieldKind::TechList => match coerce_tech(value) {
                Some(_) => Ok(()),
                None => self.wrong_type(format!(
                    "{} must be a list or a comma-separated string",
                    self.field
                )),
            },
        }
    }

    fn wrong_type(&self, message: String) -> Result<(), FieldViolation> {
        match self.wrong_type {
            WrongType::Reject => Err(self.violation(message)),
            WrongType::Ignore => Ok(()),
        }
    }

    fn violation(&self, message: String) -> FieldViolation {
        FieldViolation::new(self.field, message)
    }
}

/// A named, fixed collection of field rules
#[derive(Debug, Clone, Copy)]
pub struct RuleSet {
    rules: &'static [FieldRule],
}

pub const CREATE_RULES: RuleSet = RuleSet {
    rules: &[
        FieldRule::create(TITLE, TITLE_KIND, Presence::Required),
        FieldRule::create(DESCRIPTION, DESCRIPTION_KIND, Presence::Required),
        FieldRule::create(TECH, FieldKind::TechList, Presence::Optional),
        FieldRule::create(GITHUB_URL, FieldKind::Url, Presence::Optional),
        FieldRule::create(DEMO_URL, FieldKind::Url, Presence::Optional),
        FieldRule::create(FEATURED, FieldKind::Boolean, Presence::Optional),
        FieldRule::create(ORDER, FieldKind::Integer, Presence::Optional),
    ],
};

/// Same bounds as create, but nothing is required and wrong-typed values are
/// skipped rather than reported; the merge step leaves those fields untouched.
pub const UPDATE_RULES: RuleSet = RuleSet {
    rules: &[
        FieldRule::update(TITLE, TITLE_KIND),
        FieldRule::update(DESCRIPTION, DESCRIPTION_KIND),
        FieldRule::update(TECH, FieldKind::TechList),
        FieldRule::update(GITHUB_URL, FieldKind::Url),
        FieldRule::update(DEMO_URL, FieldKind::Url),
        FieldRule::update(FEATURED, FieldKind::Boolean),
        FieldRule::update(ORDER, FieldKind::Integer),
    ],
};

impl RuleSet {
    pub fn knows(&self, field: &str) -> bool {
        self.rules.iter().any(|r| r.field == field)
    }

    /// Check every rule and reject unknown field names; never short-circuits
    pub fn validate(&self, fields: &ProjectFields) -> Violations {
        let mut violations = Violations::default();

        for rule in self.rules {
            if let Err(v) = rule.check(fields.get(rule.field)) {
                violations.push(v);
            }
        }

        for name in fields.names() {
            if !self.knows(name) {
                violations.push(FieldViolation::new(name, "unknown field"));
            }
        }

        violations
    }
}

pub fn coerce_text(value: &Value) -> Option<&str> {
    value.as_str()
}

/// JSON integers, or text that parses as one (multipart fields are always text)
pub fn coerce_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub fn coerce_boolean(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

pub fn coerce_tech(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::Array(_) | Value::String(_) => Some(normalize_tech(value)),
        _ => None,
    }
}

fn is_valid_url(raw: &str) -> bool {
    let raw = raw.trim();
    if raw.is_empty() {
        return true;
    }
    match url::Url::parse(raw) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host().is_some(),
        Err(_) => false,
    }
}
