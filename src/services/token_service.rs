// src/services/token_service.rs
//
// Token assinado simples: base64url(JSON das claims) + "." + base64url(HMAC-SHA256).
// Sem sessão guardada na DB: o token vale enquanto a assinatura bate e `exp` não passou.
use crate::error::{AppError, AppResult};
use base64::{
    alphabet,
    engine::{
        general_purpose::{GeneralPurpose, GeneralPurposeConfig, URL_SAFE_NO_PAD},
        DecodePaddingMode,
    },
    Engine as _,
};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

// Aceita o token com ou sem padding '='
const B64_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Claims opacas do token. A ordem das chaves é preservada (faz parte da assinatura).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claims(Map<String, Value>);

impl Claims {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn subject(&self) -> Option<&str> {
        self.get("sub").and_then(Value::as_str)
    }

    pub fn role(&self) -> Option<&str> {
        self.get("role").and_then(Value::as_str)
    }

    pub fn expires_at(&self) -> Option<i64> {
        self.get("exp").and_then(epoch_from_value)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

/// Assinar/verificar tokens. Os handlers só conhecem este trait.
pub trait TokenCodec: Send + Sync {
    fn sign(&self, claims: &Claims, ttl_secs: u64) -> AppResult<String>;

    /// `None` para qualquer token inválido (mal formado, adulterado ou expirado).
    fn verify(&self, token: &str) -> Option<Claims>;
}

// Razões internas de rejeição; só aparecem no log, nunca para quem chama
#[derive(Debug, Error)]
enum TokenError {
    #[error("formato inválido")]
    Malformed,
    #[error("assinatura não confere")]
    BadSignature,
    #[error("payload ilegível: {0}")]
    BadPayload(String),
    #[error("token expirado")]
    Expired,
}

pub struct HmacTokenCodec {
    secret: Vec<u8>,
}

impl HmacTokenCodec {
    pub fn new(secret: &[u8]) -> Self {
        Self { secret: secret.to_vec() }
    }

    fn mac(&self) -> AppResult<HmacSha256> {
        HmacSha256::new_from_slice(&self.secret).map_err(|e| {
            tracing::error!("Falha ao iniciar HMAC: {:?}", e);
            AppError::InternalServerError
        })
    }

    /// Assina com um "agora" explícito (epoch em segundos).
    pub fn sign_at(&self, claims: &Claims, ttl_secs: u64, now: i64) -> AppResult<String> {
        // iat/exp primeiro e sempre com os valores calculados aqui
        let mut body = Map::new();
        body.insert("iat".into(), Value::from(now));
        let ttl = i64::try_from(ttl_secs).unwrap_or(i64::MAX);
        body.insert("exp".into(), Value::from(now.saturating_add(ttl)));
        for (key, value) in claims.as_map() {
            if key != "iat" && key != "exp" {
                body.insert(key.clone(), value.clone());
            }
        }

        // JSON compacto, UTF-8 cru: estes bytes são exatamente o que se assina
        let payload = serde_json::to_vec(&body).map_err(|e| {
            tracing::error!("Falha ao serializar claims: {:?}", e);
            AppError::InternalServerError
        })?;

        let mut mac = self.mac()?;
        mac.update(&payload);
        let signature = mac.finalize().into_bytes();

        Ok(format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(&payload),
            URL_SAFE_NO_PAD.encode(signature)
        ))
    }

    /// Verifica com um "agora" explícito.
    pub fn verify_at(&self, token: &str, now: i64) -> Option<Claims> {
        match self.decode(token, now) {
            Ok(claims) => Some(claims),
            Err(reason) => {
                tracing::debug!("Token rejeitado: {}", reason);
                None
            }
        }
    }

    fn decode(&self, token: &str, now: i64) -> Result<Claims, TokenError> {
        let (payload_b64, signature_b64) = token.split_once('.').ok_or(TokenError::Malformed)?;
        let payload = B64_LENIENT
            .decode(payload_b64)
            .map_err(|_| TokenError::Malformed)?;
        let signature = B64_LENIENT
            .decode(signature_b64)
            .map_err(|_| TokenError::Malformed)?;

        // verify_slice compara em tempo constante
        let mut mac = self.mac().map_err(|_| TokenError::BadSignature)?;
        mac.update(&payload);
        mac.verify_slice(&signature)
            .map_err(|_| TokenError::BadSignature)?;

        let claims: Map<String, Value> = serde_json::from_slice(&payload)
            .map_err(|e| TokenError::BadPayload(e.to_string()))?;

        let exp = claims.get("exp").and_then(epoch_from_value).unwrap_or(0);
        if exp < now {
            return Err(TokenError::Expired);
        }

        Ok(Claims(claims))
    }
}

impl TokenCodec for HmacTokenCodec {
    fn sign(&self, claims: &Claims, ttl_secs: u64) -> AppResult<String> {
        self.sign_at(claims, ttl_secs, now_epoch())
    }

    fn verify(&self, token: &str) -> Option<Claims> {
        self.verify_at(token, now_epoch())
    }
}

fn now_epoch() -> i64 {
    chrono::Utc::now().timestamp()
}

// `exp` pode vir como inteiro, decimal ou texto numérico; tudo é truncado para inteiro
fn epoch_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_770_000_000;

    fn claims() -> Claims {
        Claims::new().with("sub", "paulo").with("role", "admin")
    }

    #[test]
    fn verify_returns_signed_claims_before_expiry() {
        let codec = HmacTokenCodec::new(b"segredo");
        let token = codec.sign_at(&claims(), 3600, NOW).unwrap();

        let verified = codec.verify_at(&token, NOW + 3599).unwrap();
        assert_eq!(verified.subject(), Some("paulo"));
        assert_eq!(verified.role(), Some("admin"));
        assert_eq!(verified.get("iat"), Some(&Value::from(NOW)));
        assert_eq!(verified.expires_at(), Some(NOW + 3600));
    }

    #[test]
    fn token_is_valid_at_exp_and_invalid_after() {
        let codec = HmacTokenCodec::new(b"segredo");
        let token = codec.sign_at(&claims(), 60, NOW).unwrap();

        assert!(codec.verify_at(&token, NOW + 60).is_some());
        assert!(codec.verify_at(&token, NOW + 61).is_none());
    }

    #[test]
    fn huge_ttl_saturates_instead_of_expiring() {
        let codec = HmacTokenCodec::new(b"segredo");
        let token = codec.sign_at(&claims(), u64::MAX, NOW).unwrap();

        let verified = codec.verify_at(&token, NOW).unwrap();
        assert_eq!(verified.expires_at(), Some(i64::MAX));
    }

    #[test]
    fn other_secret_never_verifies() {
        let token = HmacTokenCodec::new(b"segredo-1").sign_at(&claims(), 3600, NOW).unwrap();
        assert!(HmacTokenCodec::new(b"segredo-2").verify_at(&token, NOW).is_none());
    }

    #[test]
    fn computed_iat_and_exp_override_caller_values() {
        let codec = HmacTokenCodec::new(b"segredo");
        let sneaky = claims().with("exp", NOW + 999_999).with("iat", 0);
        let token = codec.sign_at(&sneaky, 10, NOW).unwrap();

        let verified = codec.verify_at(&token, NOW).unwrap();
        assert_eq!(verified.expires_at(), Some(NOW + 10));
        assert!(codec.verify_at(&token, NOW + 11).is_none());
    }

    #[test]
    fn payload_is_compact_json_with_raw_utf8() {
        let codec = HmacTokenCodec::new(b"segredo");
        let token = codec
            .sign_at(&Claims::new().with("sub", "joão"), 5, NOW)
            .unwrap();

        let (payload_b64, _) = token.split_once('.').unwrap();
        let payload = URL_SAFE_NO_PAD.decode(payload_b64).unwrap();
        assert_eq!(
            String::from_utf8(payload).unwrap(),
            format!(r#"{{"iat":{},"exp":{},"sub":"joão"}}"#, NOW, NOW + 5)
        );
        assert!(!token.contains('='));
    }

    #[test]
    fn padded_halves_are_accepted() {
        let codec = HmacTokenCodec::new(b"segredo");
        let token = codec.sign_at(&claims(), 60, NOW).unwrap();
        let (payload_b64, sig_b64) = token.split_once('.').unwrap();

        let pad = |s: &str| format!("{}{}", s, "=".repeat((4 - s.len() % 4) % 4));
        let padded = format!("{}.{}", pad(payload_b64), pad(sig_b64));
        assert!(codec.verify_at(&padded, NOW).is_some());
    }

    #[test]
    fn tampered_or_malformed_tokens_are_rejected() {
        let codec = HmacTokenCodec::new(b"segredo");
        let token = codec.sign_at(&claims(), 60, NOW).unwrap();
        let (_, sig_b64) = token.split_once('.').unwrap();

        let forged_payload = URL_SAFE_NO_PAD.encode(
            format!(r#"{{"iat":{},"exp":{},"sub":"paulo","role":"root"}}"#, NOW, NOW + 60),
        );
        let forged = format!("{}.{}", forged_payload, sig_b64);

        assert!(codec.verify_at(&forged, NOW).is_none());
        assert!(codec.verify_at("sem-ponto", NOW).is_none());
        assert!(codec.verify_at("!!!.???", NOW).is_none());
        assert!(codec.verify_at("", NOW).is_none());
    }

    #[test]
    fn signed_non_json_payload_is_rejected() {
        let codec = HmacTokenCodec::new(b"segredo");
        let payload = b"isto nao e json";
        let mut mac = codec.mac().unwrap();
        mac.update(payload);
        let token = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(payload),
            URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes())
        );
        assert!(codec.verify_at(&token, NOW).is_none());
    }

    #[test]
    fn trait_object_round_trip_uses_wall_clock() {
        let codec: Box<dyn TokenCodec> = Box::new(HmacTokenCodec::new(b"segredo"));
        let token = codec.sign(&claims(), 60).unwrap();
        assert_eq!(codec.verify(&token).and_then(|c| c.subject().map(String::from)), Some("paulo".into()));
    }
}
