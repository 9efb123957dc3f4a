use serde::Serialize;

/// Success envelope: `{status: "success", results?, data?, message?}`.
///
/// List endpoints carry a `results` count alongside the data; single-row
/// and action endpoints omit it.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn data(data: T) -> Self {
        Self {
            status: "success",
            results: None,
            data: Some(data),
            message: None,
        }
    }

    pub fn data_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            status: "success",
            results: None,
            data: Some(data),
            message: Some(message.into()),
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self {
            status: "success",
            results: None,
            data: None,
            message: Some(message.into()),
        }
    }
}

impl<T: Serialize> ApiResponse<Vec<T>> {
    pub fn list(data: Vec<T>) -> Self {
        Self {
            status: "success",
            results: Some(data.len()),
            data: Some(data),
            message: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_envelope_carries_results_count() {
        let json = serde_json::to_value(ApiResponse::list(vec![1, 2, 3])).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["results"], 3);
        assert_eq!(json["data"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn message_envelope_omits_empty_fields() {
        let json = serde_json::to_value(ApiResponse::<()>::message("ok")).unwrap();
        assert!(json.get("results").is_none());
        assert!(json.get("data").is_none());
        assert_eq!(json["message"], "ok");
    }
}
