//! Remediation knowledge base
//!
//! Static lookup table mapping (vulnerability category, language) to
//! remediation guidance. Pure data; the detection engines never call this
//! directly, the CLI composes it with their findings.

use crate::models::Category;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Remediation guidance for one (category, language) pair.
#[derive(Debug, Clone, Serialize)]
pub struct Remediation {
    pub solution: &'static str,
    pub example: &'static str,
    pub libraries: &'static [&'static str],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<&'static str>,
}

type Table = HashMap<(Category, &'static str), Remediation>;

fn table() -> &'static Table {
    static TABLE: OnceLock<Table> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut t = Table::new();
        t.insert(
            (Category::SqlInjection, "java"),
            Remediation {
                solution: "Use PreparedStatement",
                example: r#"String sql = "SELECT * FROM users WHERE id = ?";"#,
                libraries: &["java.sql.PreparedStatement"],
                extra: Some("stmt.setString(1, userInput);"),
            },
        );
        t.insert(
            (Category::SqlInjection, "python"),
            Remediation {
                solution: "Use parameterized queries",
                example: r#"cursor.execute("SELECT * FROM users WHERE id = %s", (user_id,))"#,
                libraries: &["psycopg2", "sqlite3", "SQLAlchemy", "mysql.connector"],
                extra: Some(
                    "Never use % or .format() on the query string; pass params as second argument.",
                ),
            },
        );
        t.insert(
            (Category::SqlInjection, "php"),
            Remediation {
                solution: "Use PDO prepared statements",
                example: r#"$stmt = $pdo->prepare("SELECT * FROM users WHERE id = ?"); $stmt->execute([$id]);"#,
                libraries: &["PDO", "mysqli"],
                extra: None,
            },
        );
        t.insert(
            (Category::SqlInjection, "csharp"),
            Remediation {
                solution: "Use parameterized SqlCommand",
                example: r#"cmd.CommandText = "SELECT * FROM users WHERE id = @id"; cmd.Parameters.AddWithValue("@id", id);"#,
                libraries: &["System.Data.SqlClient"],
                extra: None,
            },
        );
        t.insert(
            (Category::Xss, "python"),
            Remediation {
                solution: "Escape output and use CSP",
                example: "from markupsafe import escape; escape(user_input)",
                libraries: &["markupsafe", "bleach"],
                extra: None,
            },
        );
        t.insert(
            (Category::Xss, "java"),
            Remediation {
                solution: "Use OWASP Java Encoder",
                example: "Encoder.forHtml(userInput)",
                libraries: &["org.owasp.encoder"],
                extra: None,
            },
        );
        t.insert(
            (Category::CommandInjection, "python"),
            Remediation {
                solution: "Use subprocess with list args, never shell=True with user input",
                example: r#"subprocess.run(["ls", "-la"], capture_output=True)"#,
                libraries: &["subprocess"],
                extra: None,
            },
        );
        t
    })
}

/// Look up remediation for a category and language (case-insensitive
/// language). Unknown pairs yield `None`.
pub fn get(category: Category, language: &str) -> Option<&'static Remediation> {
    let language = language.trim().to_lowercase();
    table()
        .iter()
        .find(|((cat, lang), _)| *cat == category && *lang == language)
        .map(|(_, remediation)| remediation)
}

/// Languages with guidance for a category, sorted for stable output.
pub fn languages_for(category: Category) -> Vec<&'static str> {
    let mut langs: Vec<&'static str> = table()
        .keys()
        .filter(|(cat, _)| *cat == category)
        .map(|(_, lang)| *lang)
        .collect();
    langs.sort_unstable();
    langs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_pair() {
        let remediation = get(Category::SqlInjection, "python").unwrap();
        assert_eq!(remediation.solution, "Use parameterized queries");
        assert!(remediation.libraries.contains(&"psycopg2"));
        assert!(remediation.extra.is_some());
    }

    #[test]
    fn test_language_is_case_insensitive() {
        assert!(get(Category::SqlInjection, "Java").is_some());
        assert!(get(Category::SqlInjection, " JAVA ").is_some());
    }

    #[test]
    fn test_unknown_pair_is_none() {
        assert!(get(Category::SqlInjection, "cobol").is_none());
        assert!(get(Category::Xss, "php").is_none());
    }

    #[test]
    fn test_languages_for_category() {
        assert_eq!(
            languages_for(Category::SqlInjection),
            vec!["csharp", "java", "php", "python"]
        );
        assert_eq!(languages_for(Category::CommandInjection), vec!["python"]);
    }

    #[test]
    fn test_serialization_skips_missing_extra() {
        let remediation = get(Category::Xss, "java").unwrap();
        let json = serde_json::to_value(remediation).unwrap();
        assert!(json.get("extra").is_none());
        assert_eq!(json["solution"], "Use OWASP Java Encoder");
    }
}
