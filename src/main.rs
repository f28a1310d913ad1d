use anyhow::{bail, Context, Result};
use tracing::info;

use createathon_judge::{Challenge, Judge, JudgeConfig, LanguageRegistry, RunRequest};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("createathon_judge=info".parse()?),
        )
        .init();

    dotenvy::dotenv().ok();

    // Load language configurations
    let languages = match std::env::var("LANGUAGES_CONFIG") {
        Ok(path) => {
            let registry = LanguageRegistry::from_path(&path)?;
            info!("Loaded language configurations from {}", path);
            registry
        }
        Err(_) => LanguageRegistry::bundled()?,
    };

    let config = JudgeConfig::from_env();
    let supported = languages.supported_tags().join(", ");
    let judge = Judge::new(config, languages);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let argv: Vec<&str> = args.iter().map(String::as_str).collect();

    match argv.as_slice() {
        ["grade", source_file, language, challenge_file] => {
            let source = read_arg_file(source_file)?;
            let challenge: Challenge = serde_json::from_str(&read_arg_file(challenge_file)?)
                .with_context(|| format!("invalid challenge JSON in {}", challenge_file))?;

            match judge.grade(&challenge, &source, language).await {
                Ok(result) => {
                    if let Some(credit) = result.credit(&challenge) {
                        info!(
                            "score credit: challenge={}, points={}",
                            credit.challenge_id, credit.points
                        );
                    }
                    println!("{}", serde_json::to_string_pretty(&result)?);
                }
                Err(e) => bail!("submission rejected: {e}"),
            }
        }
        ["run", source_file, language, stdin_file @ ..] if stdin_file.len() <= 1 => {
            let source = read_arg_file(source_file)?;
            let stdin = match stdin_file.first() {
                Some(path) => Some(read_arg_file(path)?),
                None => None,
            };

            let request = RunRequest {
                source,
                language: language.to_string(),
                stdin,
            };
            let reply = judge.run(&request).await;
            println!("{}", serde_json::to_string_pretty(&reply)?);
        }
        _ => bail!(
            "usage:\n  createathon-judge grade <source-file> <language> <challenge-json>\n  createathon-judge run <source-file> <language> [stdin-file]\nlanguages: {supported}"
        ),
    }

    Ok(())
}

fn read_arg_file(path: &str) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path))
}
