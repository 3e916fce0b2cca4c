//! Tool interface and invocation messages / 工具接口与调用消息
//!
//! A tool receives a parameter bag plus payloads for one invocation and
//! pushes an ordered message sequence back to the host surface. Messages
//! already pushed survive a failing invocation, so diagnostics emitted
//! before the error still reach the caller / 失败前已产出的消息仍会返回

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

use crate::cos::{CosClient, CosCredentials, CosError};
use crate::payload::FilePayload;

pub mod registry;

pub use registry::{ToolBox, ToolRegistry};

/// Invocation-level errors / 调用层错误
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Missing required credential: {0}")]
    MissingCredential(&'static str),
    #[error("{0} cannot start with space, / or \\")]
    InvalidPrefix(&'static str),
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Maximum number of files allowed is {0}")]
    BatchSizeExceeded(usize),
    #[error("Unsupported file type")]
    UnsupportedPayload,
    #[error(transparent)]
    Cos(#[from] CosError),
}

/// Parameter item definition / 参数项定义
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamItem {
    pub name: String,
    /// Display title (friendly name) / 显示标题
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub item_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<String>,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

impl ParamItem {
    pub fn new(name: &str, item_type: &str) -> Self {
        Self {
            name: name.to_string(),
            title: None,
            item_type: item_type.to_string(),
            default: None,
            options: None,
            required: false,
            help: None,
        }
    }

    pub fn title(mut self, val: &str) -> Self {
        self.title = Some(val.to_string());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn default(mut self, val: &str) -> Self {
        self.default = Some(val.to_string());
        self
    }

    pub fn options(mut self, val: &str) -> Self {
        self.options = Some(val.to_string());
        self
    }

    pub fn help(mut self, val: &str) -> Self {
        self.help = Some(val.to_string());
        self
    }
}

/// Tool description for listing / 工具描述信息
#[derive(Debug, Clone, Serialize)]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
    pub parameters: Vec<ParamItem>,
}

/// Metadata attached to a blob message / 随附于blob消息的文件元数据
#[derive(Debug, Clone, Default, Serialize)]
pub struct BlobMeta {
    pub filename: String,
    pub content_type: String,
    pub mime_type: String,
    pub size: u64,
    pub extension: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_image: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_as_image: Option<bool>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
}

fn serialize_base64<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&BASE64.encode(data))
}

/// One response message / 一条响应消息
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ToolMessage {
    Text {
        text: String,
    },
    Json {
        data: serde_json::Value,
    },
    Blob {
        #[serde(serialize_with = "serialize_base64")]
        data: Vec<u8>,
        meta: BlobMeta,
    },
}

/// Ordered message collector for one invocation / 单次调用的消息收集器
#[derive(Default)]
pub struct MessageSink {
    messages: Vec<ToolMessage>,
}

impl MessageSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&mut self, text: impl Into<String>) {
        self.messages.push(ToolMessage::Text { text: text.into() });
    }

    pub fn json(&mut self, data: serde_json::Value) {
        self.messages.push(ToolMessage::Json { data });
    }

    pub fn blob(&mut self, data: Vec<u8>, meta: BlobMeta) {
        self.messages.push(ToolMessage::Blob { data, meta });
    }

    pub fn messages(&self) -> &[ToolMessage] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<ToolMessage> {
        self.messages
    }
}

/// Per-invocation context supplied by the host / 宿主注入的单次调用上下文
pub struct ToolContext {
    pub credentials: CosCredentials,
}

impl ToolContext {
    pub fn new(credentials: CosCredentials) -> Self {
        Self { credentials }
    }

    /// Gateway client for the credential bucket / 凭证对应的网关客户端
    pub fn client(&self) -> Result<CosClient, CosError> {
        CosClient::new(&self.credentials)
    }
}

/// Invocation input: parameter bag plus payloads / 调用输入：参数包与文件负载
pub struct ToolInvocation {
    pub params: serde_json::Value,
    pub files: Vec<FilePayload>,
}

impl ToolInvocation {
    pub fn new(params: serde_json::Value) -> Self {
        Self {
            params,
            files: Vec::new(),
        }
    }

    pub fn with_files(params: serde_json::Value, files: Vec<FilePayload>) -> Self {
        Self { params, files }
    }
}

/// Tool interface / 工具接口
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name, unique within the registry / 工具名称
    fn name(&self) -> &'static str;

    /// One-line description / 一句话描述
    fn description(&self) -> &'static str;

    /// Parameter declarations / 参数声明
    fn parameters(&self) -> Vec<ParamItem>;

    /// Run one invocation / 执行一次调用
    async fn invoke(
        &self,
        ctx: &ToolContext,
        invocation: ToolInvocation,
        out: &mut MessageSink,
    ) -> anyhow::Result<()>;

    /// Complete tool info / 完整工具信息
    fn info(&self) -> ToolInfo {
        ToolInfo {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters(),
        }
    }
}
