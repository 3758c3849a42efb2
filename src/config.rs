use anyhow::Result;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub jwt_secret: String,
    pub model_api_url: String,
    pub model_api_key: String,
    pub ebi_base_url: String,
    pub blast_url: String,
    pub structure_base_url: String,
    pub genbank_url: String,
    pub contact_email: String,
    pub allowed_origins: Vec<String>,
    pub proxy_allow_list: Vec<String>,
    pub ebi_poll: PollSettings,
    pub blast_poll: PollSettings,
    pub structure_poll: PollSettings,
}

#[derive(Debug, Clone, Copy)]
pub struct PollSettings {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Config {
            port: env::var("PORT")
                .unwrap_or_else(|_| "3001".to_string())
                .parse()?,
            jwt_secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| "your-secret-key".to_string()),
            model_api_url: env::var("MODEL_API_URL")
                .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".to_string()),
            model_api_key: env::var("MODEL_API_KEY").unwrap_or_default(),
            ebi_base_url: env::var("EBI_BASE_URL")
                .unwrap_or_else(|_| "https://www.ebi.ac.uk/Tools/services/rest".to_string()),
            blast_url: env::var("BLAST_URL")
                .unwrap_or_else(|_| "https://blast.ncbi.nlm.nih.gov/Blast.cgi".to_string()),
            structure_base_url: env::var("STRUCTURE_BASE_URL")
                .unwrap_or_else(|_| "https://swissmodel.expasy.org/automodel".to_string()),
            genbank_url: env::var("GENBANK_URL").unwrap_or_else(|_| {
                "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/efetch.fcgi".to_string()
            }),
            contact_email: env::var("CONTACT_EMAIL")
                .unwrap_or_else(|_| "support@bioscribe.app".to_string()),
            allowed_origins: env::var("ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "https://writpro.netlify.app".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            proxy_allow_list: env::var("PROXY_ALLOW_LIST")
                .unwrap_or_else(|_| "https://blast.ncbi.nlm.nih.gov/Blast.cgi".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            ebi_poll: PollSettings {
                interval: Duration::from_millis(
                    env::var("EBI_POLL_INTERVAL_MS")
                        .unwrap_or_else(|_| "5000".to_string())
                        .parse()?,
                ),
                max_attempts: env::var("EBI_POLL_MAX_ATTEMPTS")
                    .unwrap_or_else(|_| "60".to_string())
                    .parse()?,
            },
            blast_poll: PollSettings {
                interval: Duration::from_millis(
                    env::var("BLAST_POLL_INTERVAL_MS")
                        .unwrap_or_else(|_| "5000".to_string())
                        .parse()?,
                ),
                max_attempts: env::var("BLAST_POLL_MAX_ATTEMPTS")
                    .unwrap_or_else(|_| "60".to_string())
                    .parse()?,
            },
            // Structure prediction runs longer, so it polls on a slower cadence.
            structure_poll: PollSettings {
                interval: Duration::from_millis(
                    env::var("STRUCTURE_POLL_INTERVAL_MS")
                        .unwrap_or_else(|_| "10000".to_string())
                        .parse()?,
                ),
                max_attempts: env::var("STRUCTURE_POLL_MAX_ATTEMPTS")
                    .unwrap_or_else(|_| "36".to_string())
                    .parse()?,
            },
        })
    }
}
