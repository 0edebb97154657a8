//! The `buzzdeck init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("buzzdeck.toml").exists() {
        println!("buzzdeck.toml already exists, skipping.");
    } else {
        std::fs::write("buzzdeck.toml", SAMPLE_CONFIG)?;
        println!("Created buzzdeck.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit buzzdeck.toml with your API key (or switch to grading = \"local\")");
    println!("  2. Run: buzzdeck generate --topic \"cell biology\" --title \"Biology - Cells\"");
    println!("  3. Run: buzzdeck sets list");
    println!("  4. Run: buzzdeck play <set-id>");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# buzzdeck configuration

default_provider = "openai"
default_model = "llama3-70b-8192"
generation_temperature = 0.7
data_dir = "./buzzdeck-data"

# Milliseconds between word reveals during play (100-500).
reveal_interval_ms = 300

# "semantic" grades answers with the configured LLM;
# "local" uses the built-in fuzzy matcher and needs no network.
grading = "semantic"

# Uncomment for a fixed per-question budget instead of one derived
# from question length.
# flat_budget_secs = 30

[providers.openai]
type = "openai"
api_key = "${OPENAI_API_KEY}"
# Any OpenAI-compatible endpoint works, e.g. Groq:
# base_url = "https://api.groq.com/openai"

[providers.ollama]
type = "ollama"
base_url = "http://localhost:11434"
"#;
