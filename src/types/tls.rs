use std::fs::File;
use std::io::{BufReader, Error as IoError};
use std::sync::Arc;
use rustls_pemfile::{certs, pkcs8_private_keys};
use tokio_rustls::rustls::ServerConfig;

pub struct TlsConfig {
    pub cert_path: String,
    pub key_path: String,
}

impl TlsConfig {
    pub fn new(cert_path: &str, key_path: &str) -> Self {
        Self {
            cert_path: cert_path.to_string(),
            key_path: key_path.to_string(),
        }
    }

    pub fn build_server_config(&self) -> Result<Arc<ServerConfig>, IoError> {
        let cert_file = File::open(&self.cert_path).map_err(|e| {
            IoError::new(e.kind(), format!("cannot open certificate {}: {}", self.cert_path, e))
        })?;
        let key_file = File::open(&self.key_path).map_err(|e| {
            IoError::new(e.kind(), format!("cannot open private key {}: {}", self.key_path, e))
        })?;

        let mut cert_reader = BufReader::new(cert_file);
        let mut key_reader = BufReader::new(key_file);

        let cert_chain = certs(&mut cert_reader).collect::<Result<Vec<_>, _>>()?;

        let mut keys = pkcs8_private_keys(&mut key_reader).collect::<Result<Vec<_>, _>>()?;

        if keys.is_empty() {
            return Err(IoError::new(
                std::io::ErrorKind::InvalidInput,
                "No private keys found",
            ));
        }

        let key = keys.remove(0);

        let mut config = ServerConfig::builder()
            .with_no_client_auth()
            .with_single_cert(cert_chain, key.into())
            .map_err(|e| IoError::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;

        config.alpn_protocols = vec![b"h2".to_vec(), b"http/1.1".to_vec()];

        Ok(Arc::new(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_cert_file_fails() {
        let config = TlsConfig::new("/nonexistent/cert.pem", "/nonexistent/key.pem");
        let err = config.build_server_config().unwrap_err();
        assert!(err.to_string().contains("cert.pem"));
    }
}
