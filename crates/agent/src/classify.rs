use shoplens_core::domain::intent::{ClassifiedIntent, Intent};

struct ClassifierRule {
    intent: Intent,
    keywords: &'static [&'static str],
}

// Evaluated top to bottom; the table order is the tie-break order.
const RULES: &[ClassifierRule] = &[
    ClassifierRule {
        intent: Intent::Inventory,
        keywords: &["inventory", "stock", "reorder", "restock"],
    },
    ClassifierRule {
        intent: Intent::Products,
        keywords: &["top selling", "best selling", "best-selling", "top product", "best seller", "selling products"],
    },
    ClassifierRule {
        intent: Intent::Sales,
        keywords: &["sales", "revenue", "sold", "sell", "turnover"],
    },
    ClassifierRule {
        intent: Intent::Customers,
        keywords: &["customer", "repeat", "buyer", "shopper"],
    },
];

/// Stage A: case-insensitive keyword match over the ordered rule table, plus
/// heuristic parameter extraction from the tokenized text.
pub fn classify(text: &str) -> ClassifiedIntent {
    let normalized = text.to_ascii_lowercase();
    let tokens = tokenize(&normalized);

    let intent = RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|keyword| normalized.contains(keyword)))
        .map(|rule| rule.intent)
        .unwrap_or(Intent::Unknown);

    ClassifiedIntent {
        intent,
        top_n: extract_top_n(&tokens),
        window_days: extract_window_days(&tokens),
        threshold: extract_threshold(&tokens),
    }
}

fn tokenize(text: &str) -> Vec<String> {
    let mut sanitized = String::with_capacity(text.len());
    for character in text.chars() {
        if character.is_ascii_alphanumeric() {
            sanitized.push(character);
        } else {
            sanitized.push(' ');
        }
    }
    sanitized.split_whitespace().map(|token| token.to_string()).collect()
}

/// An integer adjacent to "top" or "selling" ("top 5 selling products",
/// "5 best selling items").
fn extract_top_n(tokens: &[String]) -> Option<u32> {
    for window in tokens.windows(2) {
        let [first, second] = window else {
            continue;
        };

        if first == "top" {
            if let Ok(value) = second.parse::<u32>() {
                return Some(value);
            }
        }
        if matches!(second.as_str(), "top" | "selling" | "best") {
            if let Ok(value) = first.parse::<u32>() {
                return Some(value);
            }
        }
    }
    None
}

/// "last/past N days|weeks|months", or a bare "last week"/"past month".
fn extract_window_days(tokens: &[String]) -> Option<u32> {
    for (index, token) in tokens.iter().enumerate() {
        if token != "last" && token != "past" {
            continue;
        }
        let rest = &tokens[index + 1..];

        if let [first, second, ..] = rest {
            if let (Ok(count), Some(per_unit)) = (first.parse::<u32>(), unit_days(second)) {
                return Some(count.saturating_mul(per_unit));
            }
        }
        if let [first, ..] = rest {
            if let Some(per_unit) = unit_days(first) {
                return Some(per_unit);
            }
        }
    }
    None
}

fn unit_days(token: &str) -> Option<u32> {
    match token {
        "day" | "days" => Some(1),
        "week" | "weeks" => Some(7),
        "month" | "months" => Some(30),
        _ => None,
    }
}

/// An integer after "less than", "fewer than", "below", or "under".
fn extract_threshold(tokens: &[String]) -> Option<u32> {
    for (index, token) in tokens.iter().enumerate() {
        let marker = match token.as_str() {
            "below" | "under" => true,
            "than" => {
                index > 0 && matches!(tokens[index - 1].as_str(), "less" | "fewer")
            }
            _ => false,
        };
        if !marker {
            continue;
        }

        if let Some(value) = tokens.get(index + 1).and_then(|next| next.parse::<u32>().ok()) {
            return Some(value);
        }
    }
    None
}
