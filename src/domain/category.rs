/// Closed set of ticket categories. Each maps to a Jira issue-type id and a
/// human-readable label shown back to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryCode {
    HardwareIncident,
    Networking,
    Access,
    CloudInfra,
    ServerRequest,
    SecurityCertificate,
}

impl CategoryCode {
    pub const ALL: [CategoryCode; 6] = [
        CategoryCode::HardwareIncident,
        CategoryCode::Networking,
        CategoryCode::Access,
        CategoryCode::CloudInfra,
        CategoryCode::ServerRequest,
        CategoryCode::SecurityCertificate,
    ];

    /// Jira issue-type id for the create-issue request.
    pub fn issue_type_id(&self) -> &'static str {
        match self {
            CategoryCode::HardwareIncident => "10103",
            CategoryCode::Networking => "10150",
            CategoryCode::Access => "10117",
            CategoryCode::CloudInfra => "10149",
            CategoryCode::ServerRequest => "10146",
            CategoryCode::SecurityCertificate => "10147",
        }
    }

    /// Canonical label, as routed to the support teams.
    pub fn label(&self) -> &'static str {
        match self {
            CategoryCode::HardwareIncident => "Incidencia Tecnológica",
            CategoryCode::Networking => "Redes",
            CategoryCode::Access => "Acceso",
            CategoryCode::CloudInfra => "Solicitudes de AWS",
            CategoryCode::ServerRequest => "Solicitudes para servidores",
            CategoryCode::SecurityCertificate => "Certificado de Seguridad",
        }
    }
}
