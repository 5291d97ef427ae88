use serde_json::{json, Map, Value};

/// One of the ten post archetypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostFormat {
    /// Stable key, used as the JSON field name.
    pub key: &'static str,
    pub display_name: &'static str,
    /// What the model is told this format looks like.
    pub guidance: &'static str,
}

/// Registry of formats in display order.
pub const FORMATS: [PostFormat; 10] = [
    PostFormat {
        key: "hook",
        display_name: "🎣 The Hook",
        guidance: "A bold opening line that stops the scroll, followed by one or two short lines of payoff.",
    },
    PostFormat {
        key: "contrarian",
        display_name: "🔥 The Contrarian",
        guidance: "Challenge the popular belief head on, then state what is actually true.",
    },
    PostFormat {
        key: "listicle",
        display_name: "📋 The Listicle",
        guidance: "A one-line setup followed by 3 to 5 numbered points, one per line.",
    },
    PostFormat {
        key: "micro_story",
        display_name: "📖 The Micro-Story",
        guidance: "A tiny story in three beats: situation, turn, lesson. Each beat on its own line.",
    },
    PostFormat {
        key: "how_to",
        display_name: "🛠 The How-To",
        guidance: "A concrete, actionable process in short steps, one per line.",
    },
    PostFormat {
        key: "question",
        display_name: "❓ The Question",
        guidance: "Open with a provocative question, give your short answer, invite replies.",
    },
    PostFormat {
        key: "one_liner",
        display_name: "⚡ The One-Liner",
        guidance: "The whole thesis in a single punchy, quotable sentence.",
    },
    PostFormat {
        key: "before_after",
        display_name: "🔄 Before / After",
        guidance: "Contrast how things look before and after applying the idea, on separate lines.",
    },
    PostFormat {
        key: "myth_buster",
        display_name: "💥 The Myth Buster",
        guidance: "Name a common myth, then dismantle it with one clear reason.",
    },
    PostFormat {
        key: "call_to_action",
        display_name: "📣 The Call to Action",
        guidance: "State the stakes, then tell the reader exactly what to do today.",
    },
];

pub fn find(key: &str) -> Option<&'static PostFormat> {
    FORMATS.iter().find(|f| f.key == key)
}

pub fn is_known(key: &str) -> bool {
    find(key).is_some()
}

/// Human readable name, or the key itself for formats not in the registry.
pub fn display_name(key: &str) -> &str {
    find(key).map(|f| f.display_name).unwrap_or(key)
}

/// Response schema for the post generation call: one required string per format.
pub fn posts_schema() -> Value {
    let properties: Map<String, Value> = FORMATS
        .iter()
        .map(|f| (f.key.to_string(), json!({ "type": "STRING" })))
        .collect();
    let keys: Vec<&str> = FORMATS.iter().map(|f| f.key).collect();

    json!({
        "type": "OBJECT",
        "properties": properties,
        "required": keys,
        "propertyOrdering": keys,
    })
}
