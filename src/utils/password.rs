use hmac::Hmac;
use pbkdf2::pbkdf2;
use sha2::Sha256;
use rand::Rng;
use rand::distributions::Alphanumeric;
use base64::{Engine, engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD}};
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

pub const DEFAULT_ITERATIONS: u32 = 260000;
const KEY_LENGTH: usize = 32;
const SALT_LENGTH: usize = 16;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Invalid hash format")]
    InvalidFormat,
    #[error("Unsupported hash algorithm: {0}")]
    UnsupportedAlgorithm(String),
    #[error("Invalid iterations")]
    InvalidIterations,
    #[error("Failed to decode {0}")]
    Decode(&'static str),
    #[error("PBKDF2 failure")]
    Derivation,
}

/// Hash parsé au format Werkzeug : pbkdf2:sha256:iterations$salt$hash
#[derive(Debug)]
struct StoredHash {
    iterations: u32,
    salt: Vec<u8>,
    hash: Vec<u8>,
}

impl StoredHash {
    fn parse(stored_hash: &str) -> Result<Self, PasswordError> {
        let mut parts = stored_hash.split('$');
        let (Some(header), Some(salt), Some(hash), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(PasswordError::InvalidFormat);
        };

        let header_parts: Vec<&str> = header.split(':').collect();
        if header_parts.len() != 3 {
            return Err(PasswordError::InvalidFormat);
        }
        if header_parts[0] != "pbkdf2" || header_parts[1] != "sha256" {
            return Err(PasswordError::UnsupportedAlgorithm(header.to_string()));
        }

        let iterations = header_parts[2]
            .parse::<u32>()
            .map_err(|_| PasswordError::InvalidIterations)?;
        if iterations == 0 {
            return Err(PasswordError::InvalidIterations);
        }

        // Comme Werkzeug : le salt est utilisé tel quel (texte brut)
        if salt.is_empty() {
            return Err(PasswordError::Decode("salt"));
        }
        let hash = decode_hash(hash)?;
        // Au moins la taille d'une clé PBKDF2-SHA256
        if hash.len() < KEY_LENGTH {
            return Err(PasswordError::Decode("hash"));
        }

        Ok(StoredHash {
            iterations,
            salt: salt.as_bytes().to_vec(),
            hash,
        })
    }
}

/// Hash un mot de passe au format Werkzeug (commande hash-password, tests)
pub fn hash_password_with_iterations(password: &str, iterations: u32) -> Result<String, PasswordError> {
    if iterations == 0 {
        return Err(PasswordError::InvalidIterations);
    }

    // Salt alphanumérique de 16 caractères, comme werkzeug.security
    let salt: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SALT_LENGTH)
        .map(char::from)
        .collect();

    let mut key = [0u8; KEY_LENGTH];
    pbkdf2::<HmacSha256>(password.as_bytes(), salt.as_bytes(), iterations, &mut key)
        .map_err(|_| PasswordError::Derivation)?;

    Ok(format!("pbkdf2:sha256:{}${}${}", iterations, salt, hex::encode(key)))
}

/// Vérifie qu'un hash stocké est exploitable (utilisé au chargement de la config)
pub fn check_hash_format(stored_hash: &str) -> Result<(), PasswordError> {
    StoredHash::parse(stored_hash).map(|_| ())
}

/// Vérifie un mot de passe contre un hash Werkzeug.
/// La comparaison finale est en temps constant.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, PasswordError> {
    let stored = StoredHash::parse(stored_hash)?;

    let mut computed = vec![0u8; stored.hash.len()];
    pbkdf2::<HmacSha256>(password.as_bytes(), &stored.salt, stored.iterations, &mut computed)
        .map_err(|_| PasswordError::Derivation)?;

    Ok(computed.ct_eq(&stored.hash).into())
}

fn decode_hash(input: &str) -> Result<Vec<u8>, PasswordError> {
    // Format hexadécimal (Werkzeug), sinon base64
    if input.len() % 2 == 0 && !input.is_empty() && input.chars().all(|c| c.is_ascii_hexdigit()) {
        return hex::decode(input).map_err(|_| PasswordError::Decode("hash"));
    }

    URL_SAFE_NO_PAD
        .decode(input)
        .or_else(|_| STANDARD.decode(input))
        .map_err(|_| PasswordError::Decode("hash"))
}
