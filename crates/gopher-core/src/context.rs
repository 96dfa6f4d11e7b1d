//! Request-scoped metadata passed explicitly through services and repositories

/// Metadata about the request being served.
///
/// Built once per request by the server middleware and handed down by
/// reference, so log events anywhere in the call chain can carry it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub request_id: String,
    pub server_id: String,
    pub endpoint: Option<String>,
    pub client_ip: Option<String>,
    pub forwarded_for: Option<String>,
    pub forwarded_proto: Option<String>,
}

impl RequestContext {
    /// A context with a freshly generated request id.
    pub fn new(server_id: impl Into<String>) -> Self {
        Self {
            request_id: uuid::Uuid::new_v4().to_string(),
            server_id: server_id.into(),
            ..Self::default()
        }
    }

    /// Context for work that is not tied to an HTTP request (seeding, tests).
    pub fn background(server_id: impl Into<String>) -> Self {
        Self {
            request_id: "background".to_string(),
            server_id: server_id.into(),
            ..Self::default()
        }
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = request_id.into();
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_client_ip(mut self, client_ip: impl Into<String>) -> Self {
        self.client_ip = Some(client_ip.into());
        self
    }

    pub fn with_forwarded_for(mut self, forwarded_for: impl Into<String>) -> Self {
        self.forwarded_for = Some(forwarded_for.into());
        self
    }

    pub fn with_forwarded_proto(mut self, forwarded_proto: impl Into<String>) -> Self {
        self.forwarded_proto = Some(forwarded_proto.into());
        self
    }
}
