//! Server certificate chain capture.
//!
//! Completes a TLS handshake with a verifier that accepts any certificate,
//! then reads the chain the server presented and PEM-encodes it. The result
//! feeds the CustomBundleTls fallback stage. Nothing here grants trust: the
//! captured chain is only written out so a later connection can validate
//! against it explicitly.

use std::sync::Arc;

use async_trait::async_trait;
use rustls::client::danger::{
    HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier,
};
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{ClientConfig, DigitallySignedStruct, RootCertStore};
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;

use s3_doctor_common::DEFAULT_TLS_PORT;
use s3_doctor_storage::{ConnectError, FetchCertificateChain};

/// Chain fetcher backed by a rustls handshake.
pub struct RustlsChainFetcher;

#[async_trait]
impl FetchCertificateChain for RustlsChainFetcher {
    async fn fetch_chain_pem(&self, endpoint: &str) -> Result<Vec<u8>, ConnectError> {
        let (host, port) = host_and_port(endpoint)?;

        let connector = TlsConnector::from(Arc::new(capture_client_config()?));
        let stream = TcpStream::connect((host.as_str(), port))
            .await
            .map_err(|e| chain_err(format!("connect to {host}:{port} failed: {e}")))?;

        let server_name = ServerName::try_from(host.clone())
            .map_err(|e| chain_err(format!("invalid server name {host}: {e}")))?;
        let tls_stream = connector
            .connect(server_name, stream)
            .await
            .map_err(|e| chain_err(format!("handshake with {host}:{port} failed: {e}")))?;

        let (_, connection) = tls_stream.get_ref();
        let chain = connection
            .peer_certificates()
            .ok_or_else(|| chain_err("server presented no certificate chain".to_string()))?;

        log::debug!("captured {} certificate(s) from {host}:{port}", chain.len());
        Ok(pem_encode_chain(chain))
    }
}

fn chain_err(message: String) -> ConnectError {
    ConnectError::ChainFetch { message }
}

/// Extract host and port from an endpoint URL, defaulting to 443.
fn host_and_port(endpoint: &str) -> Result<(String, u16), ConnectError> {
    let stripped = endpoint
        .strip_prefix("https://")
        .or_else(|| endpoint.strip_prefix("http://"))
        .unwrap_or(endpoint);
    let authority = stripped.split('/').next().unwrap_or_default();

    if authority.is_empty() {
        return Err(chain_err(format!("endpoint has no host: {endpoint}")));
    }

    match authority.rsplit_once(':') {
        Some((host, port)) => {
            let port: u16 = port
                .parse()
                .map_err(|_| chain_err(format!("invalid port in endpoint: {endpoint}")))?;
            Ok((host.to_string(), port))
        }
        None => Ok((authority.to_string(), DEFAULT_TLS_PORT)),
    }
}

/// PEM-encode a captured DER chain, one CERTIFICATE block per element.
fn pem_encode_chain(chain: &[CertificateDer<'_>]) -> Vec<u8> {
    let blocks: Vec<pem::Pem> = chain
        .iter()
        .map(|der| pem::Pem::new("CERTIFICATE", der.as_ref().to_vec()))
        .collect();
    pem::encode_many(&blocks).into_bytes()
}

fn capture_client_config() -> Result<ClientConfig, ConnectError> {
    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let mut config = ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .map_err(|e| chain_err(format!("TLS config: {e}")))?
        .with_root_certificates(RootCertStore::empty())
        .with_no_client_auth();

    config
        .dangerous()
        .set_certificate_verifier(Arc::new(ChainCaptureVerifier));
    Ok(config)
}

/// Verifier that accepts any server certificate so the handshake completes
/// and the presented chain can be read back.
#[derive(Debug)]
struct ChainCaptureVerifier;

impl ServerCertVerifier for ChainCaptureVerifier {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<rustls::SignatureScheme> {
        vec![
            rustls::SignatureScheme::RSA_PKCS1_SHA256,
            rustls::SignatureScheme::RSA_PKCS1_SHA384,
            rustls::SignatureScheme::RSA_PKCS1_SHA512,
            rustls::SignatureScheme::ECDSA_NISTP256_SHA256,
            rustls::SignatureScheme::ECDSA_NISTP384_SHA384,
            rustls::SignatureScheme::RSA_PSS_SHA256,
            rustls::SignatureScheme::RSA_PSS_SHA384,
            rustls::SignatureScheme::RSA_PSS_SHA512,
            rustls::SignatureScheme::ED25519,
        ]
    }
}
