//! Minimal client for the hosted model's `generateContent` call in
//! JSON-structured-output mode.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug)]
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(base_url: &str, api_key: &str, model: &str) -> Self {
        GeminiClient {
            client: reqwest::Client::new(),
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }

    /// Single best-effort call. The raw response body is returned untouched;
    /// the engine does not validate the model's output.
    pub async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<Value, anyhow::Error> {
        Ok(self
            .client
            .post(format!(
                "{}/v1beta/models/{}:generateContent",
                self.base_url, self.model
            ))
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

impl GenerateContentRequest {
    /// Structured-output request carrying the given parts, bound to the
    /// grade list schema.
    pub fn grading(parts: Vec<Part>) -> Self {
        GenerateContentRequest {
            contents: vec![Content { parts }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: grade_schema(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

impl Part {
    pub fn inline_pdf(data: String) -> Part {
        Part::InlineData {
            inline_data: InlineData {
                mime_type: "application/pdf",
                data,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: &'static str,
    pub data: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_mime_type: &'static str,
    pub response_schema: Schema,
}

#[derive(Debug, Clone, Serialize)]
pub struct Schema {
    #[serde(rename = "type")]
    pub schema_type: SchemaType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<&'static str, Schema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<&'static str>>,
}

impl Schema {
    fn of(schema_type: SchemaType) -> Self {
        Schema {
            schema_type,
            description: None,
            nullable: None,
            minimum: None,
            maximum: None,
            items: None,
            properties: None,
            required: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SchemaType {
    Array,
    Object,
    Integer,
    Number,
    String,
}

/// Shape constraint requested from the model: an ordered list of per-question
/// grade objects, every field required and non-nullable, grades bounded to
/// the 0-10 scale and question numbers positive.
pub fn grade_schema() -> Schema {
    let mut properties = BTreeMap::new();
    properties.insert(
        "questionNumber",
        Schema {
            description: Some("Question number"),
            nullable: Some(false),
            minimum: Some(1.0),
            ..Schema::of(SchemaType::Integer)
        },
    );
    properties.insert(
        "grade",
        Schema {
            description: Some("Grade given to student for this particular question out of 10"),
            nullable: Some(false),
            minimum: Some(0.0),
            maximum: Some(10.0),
            ..Schema::of(SchemaType::Number)
        },
    );
    properties.insert(
        "feedback",
        Schema {
            description: Some("Feedback for this question"),
            nullable: Some(false),
            ..Schema::of(SchemaType::String)
        },
    );

    Schema {
        description: Some("List of grade and feedback for each question"),
        items: Some(Box::new(Schema {
            properties: Some(properties),
            required: Some(vec!["questionNumber", "grade", "feedback"]),
            ..Schema::of(SchemaType::Object)
        })),
        ..Schema::of(SchemaType::Array)
    }
}
