//! Transporte newline-delimited JSON para o MCP.
//!
//! Cada mensagem é um objeto JSON-RPC 2.0 completo em uma única linha:
//!
//! ```text
//! {"jsonrpc":"2.0","id":1,"method":"initialize","params":{...}}\n
//! {"jsonrpc":"2.0","id":1,"result":{...}}\n
//! ```
//!
//! O transporte é genérico sobre leitor/escritor assíncronos; em produção usa
//! stdin/stdout do processo, nos testes usa buffers em memória.

use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

use crate::TestDinoResult;

use super::protocol::{JsonRpcError, JsonRpcId, JsonRpcRequest, JsonRpcResponse};

/// Uma linha lida do cliente.
#[derive(Debug, Clone)]
pub enum Incoming {
    Request(JsonRpcRequest),
    /// Linha que não é uma request válida; o erro já vem pronto para resposta.
    Invalid {
        id: Option<JsonRpcId>,
        error: JsonRpcError,
    },
}

/// Interpreta uma linha não vazia.
pub fn parse_line(line: &str) -> Incoming {
    let value: Value = match serde_json::from_str(line) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, "Malformed JSON received");
            return Incoming::Invalid {
                id: None,
                error: JsonRpcError::parse_error(),
            };
        }
    };

    let id = value
        .get("id")
        .cloned()
        .and_then(|id| serde_json::from_value::<JsonRpcId>(id).ok());

    match serde_json::from_value::<JsonRpcRequest>(value) {
        Ok(request) => Incoming::Request(request),
        Err(e) => Incoming::Invalid {
            id,
            error: JsonRpcError::invalid_request().with_data(Value::String(e.to_string())),
        },
    }
}

/// Transporte linha a linha.
pub struct LineTransport<R, W> {
    reader: BufReader<R>,
    writer: W,
}

/// Transporte sobre stdin/stdout do processo.
pub type StdioTransport = LineTransport<tokio::io::Stdin, tokio::io::Stdout>;

impl StdioTransport {
    pub fn stdio() -> Self {
        LineTransport::new(tokio::io::stdin(), tokio::io::stdout())
    }
}

impl<R, W> LineTransport<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader: BufReader::new(reader),
            writer,
        }
    }

    /// Lê a próxima mensagem, pulando linhas em branco.
    ///
    /// Retorna `None` no fim da entrada (cliente desconectou).
    pub async fn read_message(&mut self) -> TestDinoResult<Option<Incoming>> {
        let mut buf = Vec::new();

        loop {
            buf.clear();
            let bytes_read = self.reader.read_until(b'\n', &mut buf).await?;
            if bytes_read == 0 {
                return Ok(None);
            }

            let line = match std::str::from_utf8(&buf) {
                Ok(line) => line,
                Err(e) => {
                    tracing::warn!(error = %e, "Non UTF-8 line received");
                    return Ok(Some(Incoming::Invalid {
                        id: None,
                        error: JsonRpcError::parse_error(),
                    }));
                }
            };

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let incoming = parse_line(trimmed);
            if let Incoming::Request(request) = &incoming {
                tracing::debug!(method = %request.method, id = ?request.id, "Received request");
            }
            return Ok(Some(incoming));
        }
    }

    /// Escreve uma resposta como JSON compacto seguido de `\n`.
    pub async fn write_response(&mut self, response: &JsonRpcResponse) -> TestDinoResult<()> {
        let mut body = serde_json::to_vec(response)?;
        body.push(b'\n');

        self.writer.write_all(&body).await?;
        // sem flush o cliente pode ficar esperando
        self.writer.flush().await?;

        tracing::debug!(id = ?response.id, is_error = response.is_error(), "Sent response");
        Ok(())
    }

    /// Devolve o escritor, para inspeção em testes.
    pub fn into_writer(self) -> W {
        self.writer
    }
}
