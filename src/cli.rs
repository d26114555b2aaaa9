use std::io::{self, BufRead};

use clap::{Parser, Subcommand};

use crate::utils::password::{self, DEFAULT_ITERATIONS};

/// Backend des réclamations : serveur HTTP et outils d'administration
#[derive(Parser, Debug)]
#[command(name = "complaints_backend")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Démarre le serveur (action par défaut)
    Serve,
    /// Affiche un hash pour ADMIN_PASSWORD_HASH
    HashPassword {
        /// Mot de passe ; lu sur l'entrée standard s'il est absent
        password: Option<String>,
        #[arg(long, default_value_t = DEFAULT_ITERATIONS)]
        iterations: u32,
    },
}

/// Hash du mot de passe donné, ou de la première ligne de `input`
pub fn hash_password_command<R: BufRead>(
    password: Option<String>,
    iterations: u32,
    mut input: R,
) -> io::Result<String> {
    let password = match password {
        Some(password) => password,
        None => {
            let mut line = String::new();
            input.read_line(&mut line)?;
            line.trim_end_matches(['\r', '\n']).to_string()
        }
    };

    if password.is_empty() {
        return Err(io::Error::new(io::ErrorKind::InvalidInput, "password must not be empty"));
    }

    password::hash_password_with_iterations(&password, iterations).map_err(io::Error::other)
}
