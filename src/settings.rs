use std::collections::BTreeMap;

use serde_json::{Map, Value};

pub const DEFAULT_MODEL: &str = "gpt-4o";

/// `(value sent to the backend, label shown)`.
pub const MODEL_CHOICES: &[(&str, &str)] = &[
    ("gpt-4o", "OpenAI GPT-4o"),
    ("anthropic/claude-3-5-sonnet-20240620", "Claude 3.5 Sonnet"),
    ("dashscope/qwen-turbo", "Qwen Turbo (Free Tier)"),
    ("gemini/gemini-1.5-flash-latest", "Gemini Flash (Free Tier)"),
    ("groq/llama3-8b-8192", "Llama 3 (Groq/Free)"),
    ("xai/grok-2-vision-1212", "Grok 2 (xAI)"),
    ("mistral/mistral-large-latest", "Mistral Large"),
    ("ollama/llama3", "Local Ollama (Llama 3)"),
];

/// A credential input in the settings dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CredentialField {
    pub key: &'static str,
    pub label: &'static str,
    /// Flag the backend sets in `GET /config` when the key is stored.
    pub has_flag: &'static str,
}

pub const CREDENTIAL_FIELDS: &[CredentialField] = &[
    CredentialField { key: "OPENAI_API_KEY", label: "OpenAI Key", has_flag: "HAS_OPENAI_KEY" },
    CredentialField { key: "ANTHROPIC_API_KEY", label: "Anthropic Key", has_flag: "HAS_ANTHROPIC_KEY" },
    CredentialField { key: "GEMINI_API_KEY", label: "Gemini Key", has_flag: "HAS_GEMINI_KEY" },
    CredentialField { key: "GROQ_API_KEY", label: "Groq Key", has_flag: "HAS_GROQ_KEY" },
    CredentialField { key: "DASHSCOPE_API_KEY", label: "DashScope Key", has_flag: "HAS_DASHSCOPE_KEY" },
    CredentialField { key: "XAI_API_KEY", label: "xAI (Grok) Key", has_flag: "HAS_XAI_KEY" },
    CredentialField { key: "MISTRAL_API_KEY", label: "Mistral Key", has_flag: "HAS_MISTRAL_KEY" },
];

/// Row of the dialog that has focus: 0 is the model selector, the rest
/// are credential fields in `CREDENTIAL_FIELDS` order.
pub type FieldIndex = usize;

/// Outcome of `POST /config`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    Rejected(String),
}

impl SaveOutcome {
    pub fn from_value(body: &Value) -> Self {
        if body.get("status").and_then(|s| s.as_str()) == Some("success") {
            SaveOutcome::Saved
        } else {
            let message = body
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("unknown error")
                .to_string();
            SaveOutcome::Rejected(message)
        }
    }
}

/// State of the settings dialog.
#[derive(Debug, Clone, Default)]
pub struct SettingsForm {
    pub open: bool,
    pub loading: bool,
    pub model: String,
    /// Keys typed in this session, by env name. Never pre-filled.
    pub keys: BTreeMap<&'static str, String>,
    /// Which providers the backend says are linked.
    pub linked: BTreeMap<&'static str, bool>,
    /// Provider -> authenticated, from `GET /auth/status`.
    pub auth: BTreeMap<String, bool>,
    pub focus: FieldIndex,
}

impl SettingsForm {
    pub fn new() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            ..Default::default()
        }
    }

    /// Open the dialog in its loading state; the caller fetches `/config`.
    pub fn open(&mut self) {
        self.open = true;
        self.loading = true;
        self.focus = 0;
        self.keys.clear();
    }

    pub fn close(&mut self) {
        self.open = false;
        self.loading = false;
        self.keys.clear();
    }

    /// Fill the form from a `GET /config` body.
    pub fn load(&mut self, config: &Value) {
        self.loading = false;
        self.model = config
            .get("LLM_MODEL")
            .and_then(|m| m.as_str())
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_MODEL)
            .to_string();
        self.linked = CREDENTIAL_FIELDS
            .iter()
            .map(|f| (f.key, config.get(f.has_flag).and_then(|v| v.as_bool()).unwrap_or(false)))
            .collect();
    }

    pub fn load_failed(&mut self) {
        self.loading = false;
    }

    /// Fill the provider auth map from a `GET /auth/status` body.
    pub fn load_auth(&mut self, status: &Value) {
        self.auth = status
            .as_object()
            .map(|obj| {
                obj.iter()
                    .map(|(k, v)| (k.clone(), auth_flag(v)))
                    .collect()
            })
            .unwrap_or_default();
    }

    pub fn is_linked(&self, key: &str) -> bool {
        self.linked.get(key).copied().unwrap_or(false)
    }

    pub fn field_count(&self) -> usize {
        CREDENTIAL_FIELDS.len() + 1
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % self.field_count();
    }

    pub fn focus_prev(&mut self) {
        self.focus = (self.focus + self.field_count() - 1) % self.field_count();
    }

    pub fn focused_credential(&self) -> Option<&'static CredentialField> {
        self.focus.checked_sub(1).and_then(|i| CREDENTIAL_FIELDS.get(i))
    }

    pub fn model_index(&self) -> Option<usize> {
        MODEL_CHOICES.iter().position(|(value, _)| *value == self.model)
    }

    /// Step the model selector. An unlisted model steps to the first choice.
    pub fn cycle_model(&mut self, forward: bool) {
        let n = MODEL_CHOICES.len();
        let next = match self.model_index() {
            Some(i) if forward => (i + 1) % n,
            Some(i) => (i + n - 1) % n,
            None => 0,
        };
        self.model = MODEL_CHOICES[next].0.to_string();
    }

    pub fn type_char(&mut self, c: char) {
        if let Some(field) = self.focused_credential() {
            self.keys.entry(field.key).or_default().push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(field) = self.focused_credential() {
            if let Some(value) = self.keys.get_mut(field.key) {
                value.pop();
            }
        }
    }

    /// Body for `POST /config`: the model plus every key typed non-empty.
    /// Empty inputs are left out so stored keys are not wiped.
    pub fn payload(&self) -> Value {
        let mut body = Map::new();
        body.insert("LLM_MODEL".to_string(), Value::String(self.model.clone()));
        for (key, value) in &self.keys {
            let value = value.trim();
            if !value.is_empty() {
                body.insert((*key).to_string(), Value::String(value.to_string()));
            }
        }
        Value::Object(body)
    }
}

fn auth_flag(v: &Value) -> bool {
    match v {
        Value::Bool(b) => *b,
        Value::Object(o) => o
            .get("authenticated")
            .or_else(|| o.get("configured"))
            .and_then(|b| b.as_bool())
            .unwrap_or(false),
        _ => false,
    }
}

/// Mask a credential for display.
pub fn mask(value: &str) -> String {
    "•".repeat(value.chars().count())
}
