use base64::Engine;
use engine::Part;
use reqwest::header;
use serde::{Deserialize, Serialize};

use crate::error::AssistantError;
use crate::ideas::{Idea, ideas_prompt, image_prompt, parse_ideas};

/// An image rendered by the model, already decoded.
#[derive(Clone, Debug)]
pub struct GeneratedImage {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl GeneratedImage {
    /// File extension matching the payload's mime type.
    pub fn extension(&self) -> &'static str {
        match self.mime_type.as_str() {
            "image/jpeg" => "jpg",
            "image/webp" => "webp",
            _ => "png",
        }
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

impl<'a> GenerateRequest<'a> {
    fn from_prompt(prompt: &'a str, config: Option<GenerationConfig>) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: config,
        }
    }
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_config: Option<ImageConfig>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageConfig {
    aspect_ratio: &'static str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ReplyPart>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReplyPart {
    text: Option<String>,
    inline_data: Option<InlineData>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// HTTP client for the `generateContent` endpoint.
#[derive(Clone, Debug)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
}

impl Client {
    /// Builds a client that sends `api_key` with every request.
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, AssistantError> {
        let mut key = header::HeaderValue::try_from(api_key)
            .map_err(|err| AssistantError::InvalidKey(err.to_string()))?;
        key.set_sensitive(true);

        let mut headers = header::HeaderMap::new();
        headers.insert("x-goog-api-key", key);

        let http = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self {
            http,
            base_url: base_url.to_string(),
        })
    }

    fn url(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            model
        )
    }

    async fn generate(
        &self,
        model: &str,
        request: &GenerateRequest<'_>,
    ) -> Result<GenerateResponse, AssistantError> {
        let resp = self.http.post(self.url(model)).json(request).send().await?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp.json::<GenerateResponse>().await?);
        }

        let message = match resp.json::<ErrorBody>().await {
            Ok(body) => body.error.message,
            Err(_) => "server error".to_string(),
        };
        Err(AssistantError::Server { status, message })
    }

    /// Sends a prompt expecting a pure JSON reply and returns it unparsed.
    pub async fn generate_json(&self, model: &str, prompt: &str) -> Result<String, AssistantError> {
        let request = GenerateRequest::from_prompt(
            prompt,
            Some(GenerationConfig {
                response_mime_type: Some("application/json"),
                image_config: None,
            }),
        );
        let response = self.generate(model, &request).await?;

        let text: String = response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(AssistantError::MalformedReply(
                "reply carried no text".to_string(),
            ));
        }
        Ok(text)
    }

    /// Renders a prompt as a 16:9 image.
    pub async fn generate_image(
        &self,
        model: &str,
        prompt: &str,
    ) -> Result<GeneratedImage, AssistantError> {
        let request = GenerateRequest::from_prompt(
            prompt,
            Some(GenerationConfig {
                response_mime_type: None,
                image_config: Some(ImageConfig {
                    aspect_ratio: "16:9",
                }),
            }),
        );
        let response = self.generate(model, &request).await?;

        let inline = response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .and_then(|content| {
                content
                    .parts
                    .into_iter()
                    .find_map(|part| part.inline_data)
            })
            .ok_or_else(|| AssistantError::MalformedReply("reply carried no image".to_string()))?;

        let bytes = base64::prelude::BASE64_STANDARD
            .decode(inline.data.as_bytes())
            .map_err(|err| AssistantError::MalformedReply(format!("bad image payload: {err}")))?;

        Ok(GeneratedImage {
            mime_type: inline.mime_type,
            bytes,
        })
    }

    /// Asks the model for furniture ideas built from `parts`.
    ///
    /// Unusable entries in the reply are dropped; an empty list is a valid
    /// outcome.
    pub async fn suggest_ideas(
        &self,
        model: &str,
        parts: &[&Part],
    ) -> Result<Vec<Idea>, AssistantError> {
        let prompt = ideas_prompt(parts);
        let reply = self.generate_json(model, &prompt).await?;
        parse_ideas(&reply)
    }

    /// Renders a photo of `idea` using `palette` as the materials on show.
    pub async fn render_visual(
        &self,
        model: &str,
        idea: &Idea,
        palette: &[&Part],
    ) -> Result<GeneratedImage, AssistantError> {
        let prompt = image_prompt(idea, palette);
        self.generate_image(model, &prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_in_wire_shape() {
        let request = GenerateRequest::from_prompt(
            "sugira 3 projetos",
            Some(GenerationConfig {
                response_mime_type: Some("application/json"),
                image_config: None,
            }),
        );

        let raw = serde_json::to_value(&request).unwrap();
        assert_eq!(raw["contents"][0]["parts"][0]["text"], "sugira 3 projetos");
        assert_eq!(raw["generationConfig"]["responseMimeType"], "application/json");
        assert!(raw["generationConfig"].get("imageConfig").is_none());
    }

    #[test]
    fn image_request_carries_the_aspect_ratio() {
        let request = GenerateRequest::from_prompt(
            "photo",
            Some(GenerationConfig {
                response_mime_type: None,
                image_config: Some(ImageConfig {
                    aspect_ratio: "16:9",
                }),
            }),
        );

        let raw = serde_json::to_value(&request).unwrap();
        assert_eq!(raw["generationConfig"]["imageConfig"]["aspectRatio"], "16:9");
    }

    #[test]
    fn reply_parts_deserialize_text_and_images() {
        let raw = r#"{
            "candidates": [{
                "content": {
                    "parts": [
                        { "text": "[]" },
                        { "inlineData": { "mimeType": "image/png", "data": "aGk=" } }
                    ]
                }
            }]
        }"#;

        let response: GenerateResponse = serde_json::from_str(raw).unwrap();
        let content = response.candidates[0].content.as_ref().unwrap();
        assert_eq!(content.parts[0].text.as_deref(), Some("[]"));
        let inline = content.parts[1].inline_data.as_ref().unwrap();
        assert_eq!(inline.mime_type, "image/png");
        assert_eq!(
            base64::prelude::BASE64_STANDARD
                .decode(inline.data.as_bytes())
                .unwrap(),
            b"hi"
        );
    }
}
