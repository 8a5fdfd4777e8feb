use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use config; // Explicitly import the config crate

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    // These fields are populated from the .env file
    pub database_path: String,
    pub media_path: String,
    pub log_level: String,
}

impl Config {
    pub fn from_env(env_path: &Path) -> Result<Self, config::ConfigError> {
        // Load the specified .env file. Propagate an error if it fails.
        dotenvy::from_path(env_path)
            .map_err(|e| config::ConfigError::Message(format!(
                "FATAL: Failed to load .env file from '{}'. Error: {}", env_path.display(), e
            )))?;

        let database_path = env::var("DATABASE_PATH")
            .map_err(|_| config::ConfigError::Message(
                "FATAL: Environment variable 'DATABASE_PATH' is not set in your .env file.".to_string()
            ))?;

        let media_path = env::var("MEDIA_PATH")
            .map_err(|_| config::ConfigError::Message(
                "FATAL: Environment variable 'MEDIA_PATH' is not set in your .env file.".to_string()
            ))?;

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        // Both locations must be absolute so the embedding process cannot
        // scatter state relative to its working directory.
        if Path::new(&database_path).is_relative() {
            return Err(config::ConfigError::Message(format!(
                "FATAL: The 'DATABASE_PATH' in your .env file is a relative path ('{}'). It MUST be an absolute path.",
                database_path
            )));
        }

        if Path::new(&media_path).is_relative() {
            return Err(config::ConfigError::Message(format!(
                "FATAL: The 'MEDIA_PATH' in your .env file is a relative path ('{}'). It MUST be an absolute path.",
                media_path
            )));
        }

        let builder = config::Config::builder()
            .set_override("database_path", database_path)?
            .set_override("media_path", media_path)?
            .set_override("log_level", log_level)?
            .build()?;

        builder.try_deserialize()
    }

    /// Returns the full path to the posts database file.
    pub fn posts_db_path(&self) -> PathBuf {
        PathBuf::from(&self.database_path).join("blog.db")
    }

    /// Directory where the upload router stores image attachments.
    pub fn images_dir(&self) -> PathBuf {
        PathBuf::from(&self.media_path).join("images")
    }

    /// Directory where the upload router stores video attachments.
    pub fn videos_dir(&self) -> PathBuf {
        PathBuf::from(&self.media_path).join("videos")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    // Environment variables are process-global, so every scenario that
    // touches DATABASE_PATH/MEDIA_PATH lives in this single test.
    #[test]
    fn from_env_loads_and_validates() {
        let dir = TempDir::new().unwrap();
        let db_dir = dir.path().join("data");
        let media_dir = dir.path().join("media");

        let env_file = dir.path().join("app.env");
        fs::write(
            &env_file,
            format!(
                "DATABASE_PATH={}\nMEDIA_PATH={}\nLOG_LEVEL=debug\n",
                db_dir.display(),
                media_dir.display()
            ),
        )
        .unwrap();

        let config = Config::from_env(&env_file).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.posts_db_path(), db_dir.join("blog.db"));
        assert_eq!(config.images_dir(), media_dir.join("images"));
        assert_eq!(config.videos_dir(), media_dir.join("videos"));

        // dotenvy never overrides variables that are already set, so clear
        // them before loading the next file.
        env::remove_var("DATABASE_PATH");
        env::remove_var("MEDIA_PATH");
        env::remove_var("LOG_LEVEL");

        let bad_env = dir.path().join("bad.env");
        fs::write(&bad_env, "DATABASE_PATH=relative/data\nMEDIA_PATH=/srv/media\n").unwrap();
        assert!(Config::from_env(&bad_env).is_err());

        env::remove_var("DATABASE_PATH");
        env::remove_var("MEDIA_PATH");

        let missing = dir.path().join("does-not-exist.env");
        assert!(Config::from_env(&missing).is_err());
    }
}
