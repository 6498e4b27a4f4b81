use serde::{Deserialize, Serialize};

use crate::domain::category::CategoryCode;

/// Keyword sets for the triage rules. Operators tune these through the
/// stored config; the defaults mirror the help-desk vocabulary the bot was
/// trained against.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TriageRules {
    pub hardware_keywords: Vec<String>,
    pub networking_keywords: Vec<String>,
    pub access_keywords: Vec<String>,
    pub cloud_keywords: Vec<String>,
    pub server_keywords: Vec<String>,
    pub security_keywords: Vec<String>,
}

impl Default for TriageRules {
    fn default() -> Self {
        fn owned(words: &[&str]) -> Vec<String> {
            words.iter().map(|w| w.to_string()).collect()
        }

        Self {
            hardware_keywords: owned(&[
                "pc no prende",
                "no enciende",
                "no power",
                "no enciende luces",
                "fuente de alimentación",
                "hardware",
                "componente interno",
                "torre",
                "computadora",
                "equipo",
                "laptop",
                "botón de encendido",
                "cable de alimentación",
                "interruptor trasero",
                "reinicio de energía",
                "power cycle",
                "no da señales de vida",
            ]),
            networking_keywords: owned(&[
                "wifi",
                "red inalámbrica",
                "ethernet",
                "conexión de red",
                "network",
                "ping",
                "latencia",
                "velocidad de internet",
                "router",
                "modem",
                "switch",
                "conectividad de red",
            ]),
            access_keywords: owned(&[
                "acceso",
                "permiso",
                "login",
                "contraseña",
                "credenciales",
                "usuario bloqueado",
                "password",
                "cuenta",
                "autenticación",
            ]),
            cloud_keywords: owned(&[
                "aws", "cloud", "nube", "bucket", "ec2", "s3", "lambda",
            ]),
            server_keywords: owned(&[
                "servidor",
                "server",
                "apache",
                "nginx",
                "iis",
                "base de datos",
            ]),
            security_keywords: owned(&[
                "certificado",
                "ssl",
                "seguridad",
                "https",
                "tls",
                "encriptación",
            ]),
        }
    }
}

fn matches_any(haystack: &str, keywords: &[String]) -> bool {
    keywords
        .iter()
        .any(|keyword| haystack.contains(keyword.to_lowercase().as_str()))
}

/// Best-effort triage of free text into a ticket category.
///
/// Rules are evaluated top to bottom and the first match wins. Networking
/// only applies when no hardware keyword matched, so that network vocabulary
/// inside a dead-machine complaint does not misroute the ticket. Total:
/// anything unmatched falls back to a hardware incident.
pub fn classify(rules: &TriageRules, text: &str) -> CategoryCode {
    let lowered = text.to_lowercase();

    if matches_any(&lowered, &rules.hardware_keywords) {
        return CategoryCode::HardwareIncident;
    }
    // Hardware already won above, so network vocabulary inside a
    // dead-machine complaint never lands here.
    if matches_any(&lowered, &rules.networking_keywords) {
        return CategoryCode::Networking;
    }
    if matches_any(&lowered, &rules.access_keywords) {
        return CategoryCode::Access;
    }
    if matches_any(&lowered, &rules.cloud_keywords) {
        return CategoryCode::CloudInfra;
    }
    if matches_any(&lowered, &rules.server_keywords) {
        return CategoryCode::ServerRequest;
    }
    if matches_any(&lowered, &rules.security_keywords) {
        return CategoryCode::SecurityCertificate;
    }

    CategoryCode::HardwareIncident
}
