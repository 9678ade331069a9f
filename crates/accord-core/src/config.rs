use std::collections::HashMap;

use anyhow::Result;

/// Full application configuration.
/// Values come from the environment, falling back to a `.env` file in the
/// working directory, then to the defaults below. The API key is the only
/// sensitive field and has no default.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: String,

    // Web
    pub web_bind: String,
    pub web_port: u16,

    // LLM endpoint (OpenAI-compatible chat completions)
    pub llm_base_url: String,
    pub llm_api_key: String,
    pub llm_model: String,

    // Evidence extraction commands
    pub ocr_cmd: String,
    pub pdf_render_cmd: String,
}

fn parse_dotenv() -> HashMap<String, String> {
    let mut map = HashMap::new();
    let Ok(contents) = std::fs::read_to_string(".env") else {
        return map;
    };
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((k, v)) = line.split_once('=') {
            map.insert(k.trim().to_string(), v.trim().to_string());
        }
    }
    map
}

fn get(key: &str, dotenv: &HashMap<String, String>) -> Option<String> {
    std::env::var(key).ok().or_else(|| dotenv.get(key).cloned())
}

fn get_str(key: &str, dotenv: &HashMap<String, String>, default: &str) -> String {
    get(key, dotenv).unwrap_or_else(|| default.to_string())
}

fn get_u16(key: &str, dotenv: &HashMap<String, String>, default: u16) -> u16 {
    get(key, dotenv)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let dotenv = parse_dotenv();

        Ok(Self {
            data_dir: get_str("DATA_DIR", &dotenv, "store"),
            web_bind: get_str("WEB_BIND", &dotenv, "0.0.0.0"),
            web_port: get_u16("WEB_PORT", &dotenv, 8080),
            llm_base_url: get_str(
                "LLM_BASE_URL",
                &dotenv,
                "https://router.huggingface.co/v1",
            ),
            llm_api_key: get_str("HF_TOKEN", &dotenv, ""),
            llm_model: get_str("LLM_MODEL", &dotenv, "meta-llama/Llama-3.1-8B-Instruct"),
            ocr_cmd: get_str("OCR_CMD", &dotenv, "tesseract"),
            pdf_render_cmd: get_str("PDF_RENDER_CMD", &dotenv, "pdftoppm"),
        })
    }
}
