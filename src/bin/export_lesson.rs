use std::{env, fs};

use anyhow::Context;
use lessonkit::api::ApiClient;
use lessonkit::export;

const DEFAULT_OUTPUT_DIR: &str = "output/lessons";

pub struct Config {
    pub course_id: String,
    pub lesson_id: String,
    pub output_dir: String,
}

fn parse_config(mut args: impl Iterator<Item = String>) -> anyhow::Result<Config> {
    let course_id = args.next().context("course_id is required")?;
    let lesson_id = args.next().context("lesson_id is required")?;
    let output_dir = args.next().unwrap_or(DEFAULT_OUTPUT_DIR.to_string());

    Ok(Config {
        course_id,
        lesson_id,
        output_dir,
    })
}

fn create_output_dir(output_dir: &str) -> anyhow::Result<()> {
    if fs::metadata(output_dir).is_ok() {
        fs::remove_dir_all(output_dir)?;
    }

    fs::create_dir_all(output_dir)?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    pretty_env_logger::init();

    let config = match parse_config(env::args().skip(1)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Usage: cargo run --bin export_lesson <course_id> <lesson_id> [output_dir]");
            return Err(e);
        }
    };

    let base_url =
        env::var("LESSON_API_URL").context("LESSON_API_URL must be set (see .env.example)")?;
    let mut client = ApiClient::new(base_url);
    if let Ok(api_key) = env::var("LESSON_API_KEY") {
        client = client.with_api_key(api_key);
    }

    let lesson = client
        .get_lesson(&config.course_id, &config.lesson_id)
        .context(format!(
            "could not fetch lesson {} in course {}",
            config.lesson_id, config.course_id
        ))?;

    create_output_dir(&config.output_dir).context("failed to create output directory")?;
    export::write_lesson(&lesson, &config.output_dir)?;

    println!(
        "exported '{}' ({} blocks) to {}",
        lesson.title,
        lesson.blocks().len(),
        config.output_dir
    );

    Ok(())
}
