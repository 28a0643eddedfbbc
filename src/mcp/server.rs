//! # stdio 工具服务
//!
//! ## 设计思路
//!
//! stdout 专用于协议输出，每行一条 JSON-RPC 消息；日志只写文件或 stderr。
//! 读取循环不做耗时工作：`tools/call` 交给阻塞线程池执行，响应经由通道
//! 汇总到唯一的写出任务，保证多条响应不会交错。
//!
//! ## 实现思路
//!
//! - `initialize` / `ping` / `tools/list` 同步应答。
//! - `tools/call` 在派发前登记取消标志，再通过 `spawn_blocking` 运行转换，
//!   期间仍可接收 `notifications/cancelled` 并设置对应请求的取消标志。
//! - 非 JSON 行回 `-32700`；是 JSON 但不是合法请求对象的回 `-32600`。
//! - 输入流结束后等待所有进行中的调用写完响应再退出。

use std::sync::Arc;

use serde_json::{Value, json};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc::{self, UnboundedSender};

use super::protocol::{
    CancelledParams, INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST, JSONRPC_VERSION,
    JsonRpcRequest, JsonRpcResponse, METHOD_NOT_FOUND, PARSE_ERROR, PROTOCOL_VERSION,
    ToolCallParams, request_key,
};
use super::tools::{tool_definitions, tool_failure, tool_success};
use crate::error::AppError;
use crate::favicon::{
    CancelRegistration, FaviconServiceState, SVG_TO_FAVICON_TOOL, svg_to_favicon,
};

pub const SERVER_NAME: &str = "FaviconGenerator";

/// stdio 工具服务。
pub struct McpServer {
    service: Arc<FaviconServiceState>,
}

impl McpServer {
    pub fn new(service: Arc<FaviconServiceState>) -> Self {
        Self { service }
    }

    /// 以进程 stdin/stdout 作为传输通道运行，直到 stdin 关闭。
    pub async fn serve_stdio(self) -> Result<(), AppError> {
        self.serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await
    }

    /// 在任意按行读取的输入与输出之间运行服务。
    pub async fn serve<R, W>(self, reader: R, mut writer: W) -> Result<(), AppError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<JsonRpcResponse>();

        let writer_task = tokio::spawn(async move {
            while let Some(response) = rx.recv().await {
                let mut line = serde_json::to_vec(&response)?;
                line.push(b'\n');
                writer.write_all(&line).await?;
                writer.flush().await?;
            }
            Ok::<(), AppError>(())
        });

        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            self.dispatch_line(&line, &tx);
        }

        log::info!("输入流已关闭，等待进行中的请求完成");
        drop(tx);

        writer_task
            .await
            .map_err(|e| AppError::Transport(format!("写出任务异常退出：{}", e)))??;
        Ok(())
    }

    fn dispatch_line(&self, line: &str, tx: &UnboundedSender<JsonRpcResponse>) {
        let message: Value = match serde_json::from_str(line) {
            Ok(message) => message,
            Err(err) => {
                log::warn!("无法解析的消息：{}", err);
                send(
                    tx,
                    JsonRpcResponse::failure(Value::Null, PARSE_ERROR, format!("Parse error: {}", err)),
                );
                return;
            }
        };

        let request: JsonRpcRequest = match serde_json::from_value(message) {
            Ok(request) => request,
            Err(err) => {
                log::warn!("消息不是合法的请求对象：{}", err);
                send(
                    tx,
                    JsonRpcResponse::failure(
                        Value::Null,
                        INVALID_REQUEST,
                        format!("Invalid Request: {}", err),
                    ),
                );
                return;
            }
        };

        if request.method == "tools/call" {
            if let Some(id) = request.id.clone() {
                self.spawn_tool_call(id, request.params, tx.clone());
                return;
            }
        }

        if let Some(response) = self.handle_request(request) {
            send(tx, response);
        }
    }

    fn spawn_tool_call(&self, id: Value, params: Option<Value>, tx: UnboundedSender<JsonRpcResponse>) {
        let service = Arc::clone(&self.service);
        let registration = self.register_call(&id);

        tokio::spawn(async move {
            let call_id = id.clone();
            let response = match tokio::task::spawn_blocking(move || {
                call_tool(&service, call_id, params, registration.as_ref())
            })
            .await
            {
                Ok(response) => response,
                Err(err) => {
                    log::error!("工具调用线程异常：{}", err);
                    JsonRpcResponse::failure(id, INTERNAL_ERROR, format!("Internal error: {}", err))
                }
            };
            send(&tx, response);
        });
    }

    /// 同步处理一条请求；通知返回 `None`。
    pub fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.method == "notifications/cancelled" {
            self.handle_cancelled(request.params);
            return None;
        }

        let Some(id) = request.id else {
            log::debug!("忽略通知：{}", request.method);
            return None;
        };

        if request.jsonrpc.as_deref().is_some_and(|version| version != JSONRPC_VERSION) {
            return Some(JsonRpcResponse::failure(
                id,
                INVALID_REQUEST,
                "Invalid Request: jsonrpc must be \"2.0\"",
            ));
        }

        let response = match request.method.as_str() {
            "initialize" => JsonRpcResponse::success(id, initialize_result(request.params.as_ref())),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => JsonRpcResponse::success(id, tool_definitions()),
            "tools/call" => {
                let registration = self.register_call(&id);
                call_tool(&self.service, id, request.params, registration.as_ref())
            }
            other => JsonRpcResponse::failure(
                id,
                METHOD_NOT_FOUND,
                format!("Method not found: {}", other),
            ),
        };
        Some(response)
    }

    fn register_call(&self, id: &Value) -> Option<CancelRegistration> {
        let key = request_key(id);
        match self.service.register_cancel(&key) {
            Ok(registration) => Some(registration),
            Err(err) => {
                log::warn!("登记取消标志失败，请求 {} 将无法取消：{}", key, err);
                None
            }
        }
    }

    fn handle_cancelled(&self, params: Option<Value>) {
        let Some(params) = params else {
            return;
        };
        match serde_json::from_value::<CancelledParams>(params) {
            Ok(cancelled) => {
                let key = request_key(&cancelled.request_id);
                match self.service.cancel(&key) {
                    Ok(true) => log::info!(
                        "🛑 收到取消通知：{}（原因：{}）",
                        key,
                        cancelled.reason.as_deref().unwrap_or("-")
                    ),
                    Ok(false) => log::debug!("取消通知对应的请求不存在或已完成：{}", key),
                    Err(err) => log::warn!("处理取消通知失败：{}", err),
                }
            }
            Err(err) => log::warn!("取消通知参数无效：{}", err),
        }
    }
}

fn initialize_result(params: Option<&Value>) -> Value {
    let protocol_version = params
        .and_then(|p| p.get("protocolVersion"))
        .and_then(Value::as_str)
        .unwrap_or(PROTOCOL_VERSION);

    json!({
        "protocolVersion": protocol_version,
        "capabilities": { "tools": {} },
        "serverInfo": {
            "name": SERVER_NAME,
            "version": env!("CARGO_PKG_VERSION"),
        },
    })
}

fn call_tool(
    service: &FaviconServiceState,
    id: Value,
    params: Option<Value>,
    cancel: Option<&CancelRegistration>,
) -> JsonRpcResponse {
    let params = match params
        .map(serde_json::from_value::<ToolCallParams>)
        .transpose()
    {
        Ok(Some(params)) => params,
        Ok(None) => {
            return JsonRpcResponse::failure(id, INVALID_PARAMS, "Invalid params: missing tool name");
        }
        Err(err) => {
            return JsonRpcResponse::failure(id, INVALID_PARAMS, format!("Invalid params: {}", err));
        }
    };

    if params.name != SVG_TO_FAVICON_TOOL {
        return JsonRpcResponse::failure(
            id,
            INVALID_PARAMS,
            format!("Unknown tool: {}", params.name),
        );
    }

    let result = match svg_to_favicon(service, params.arguments, cancel) {
        Ok(report) => tool_success(report),
        Err(err) => {
            log::warn!("❌ 工具调用失败 - code={} stage={} {}", err.code, err.stage, err.message);
            tool_failure(&err)
        }
    };
    JsonRpcResponse::success(id, result)
}

fn send(tx: &UnboundedSender<JsonRpcResponse>, response: JsonRpcResponse) {
    if tx.send(response).is_err() {
        log::warn!("响应通道已关闭，丢弃响应");
    }
}
