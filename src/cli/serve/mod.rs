//! Demo HTTP host.
//!
//! | Request                   | Response                               |
//! |---------------------------|----------------------------------------|
//! | `GET <page>`              | Full element tree (JSON array)         |
//! | `POST <page>`             | `{actions, target}`                    |
//! | `POST <page>?stream=1`    | Framed actions, one JSON per line      |
//!
//! Requests run on a `rayon` pool; requests of one session are serialised.

mod lifecycle;
mod response;
mod session;

pub use lifecycle::setup_shutdown_handler;

use super::demo::Demo;
use anyhow::{Context, Result};
use percent_encoding::percent_decode_str;
use routelit::app::stream::{BlockingStream, frame};
use routelit::config::{SessionConfig, cfg};
use routelit::{Error, MemoryStore, Response, SimpleRequest, debug, log};
use serde_json::Value;
use session::SessionLocks;
use std::net::SocketAddr;
use std::sync::Arc;
use tiny_http::{Request, Server};
use tokio::runtime::Handle;

/// Query parameter selecting the NDJSON stream.
const STREAM_PARAM: &str = "stream";

/// Shared state of the request workers.
struct ServeContext {
    demo: Demo<Arc<MemoryStore>>,
    locks: SessionLocks,
    session: SessionConfig,
    addr: SocketAddr,
    runtime: Handle,
}

/// Bind and serve until Ctrl+C.
pub fn run() -> Result<()> {
    let config = cfg();
    let (server, addr) = lifecycle::bind_with_retry(config.serve.interface, config.serve.port)?;
    let server = Arc::new(server);
    lifecycle::register_server(Arc::clone(&server));
    log!("serve"; "http://{}", addr);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;

    let ctx = Arc::new(ServeContext {
        demo: Demo::new(Arc::new(MemoryStore::new()), &config),
        locks: SessionLocks::default(),
        session: config.session.clone(),
        addr,
        runtime: runtime.handle().clone(),
    });

    run_request_loop(&server, &ctx)?;
    drop(runtime);
    Ok(())
}

fn run_request_loop(server: &Server, ctx: &Arc<ServeContext>) -> Result<()> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(4)
        .build()
        .context("Failed to create thread pool")?;

    for request in server.incoming_requests() {
        let ctx = Arc::clone(ctx);
        pool.spawn(move || {
            if let Err(e) = handle_request(request, &ctx) {
                log!("serve"; "request error: {e}");
            }
        });
    }
    Ok(())
}

/// Handle a single HTTP request
fn handle_request(mut request: Request, ctx: &ServeContext) -> Result<()> {
    if lifecycle::is_shutdown() {
        return response::respond_unavailable(request);
    }

    let (path, query) = split_url(request.url());
    let Some(view) = ctx.demo.page(&path) else {
        return response::respond_not_found(request);
    };

    let (sid, fresh) = session::session_id(&request, &ctx.session.cookie);
    let cookie = fresh.then(|| session::set_cookie(&ctx.session.cookie, &sid));

    let mut req = match to_request(&mut request, ctx, &sid, &path, &query) {
        Ok(req) => req,
        Err(e) => return response::send_error(request, 400, &format!("{e:#}")),
    };
    let streaming = routelit::Request::query_param(&req, STREAM_PARAM) == Some("1");
    debug!("serve"; "{} {} session {}", request.method(), path, sid);

    let lock = ctx.locks.get(&sid);
    let handled = {
        let _guard = lock.lock();
        ctx.demo.app().handle(view, &mut req)
    };
    ctx.locks.release(&sid, lock);

    match handled {
        Ok(handled) => match handled.response {
            Response::Actions(actions) if streaming => {
                let framed = frame(&actions, handled.reruns);
                let stream = BlockingStream::spawn(&ctx.runtime, move |tx| async move {
                    for action in framed {
                        if tx.send(Ok(action)).await.is_err() {
                            return;
                        }
                    }
                });
                response::send_stream(request, stream, cookie.as_deref())
            }
            other => response::send_json(request, 200, &other.to_json(), cookie.as_deref()),
        },
        Err(e @ Error::UnsupportedMethod(_)) => response::send_error(request, 405, &e.to_string()),
        Err(e) => {
            log!("error"; "{}: {}", path, e);
            response::send_error(request, 500, &e.to_string())
        }
    }
}

/// Adapt a `tiny_http` request.
fn to_request(
    request: &mut Request,
    ctx: &ServeContext,
    sid: &str,
    path: &str,
    query: &str,
) -> Result<SimpleRequest> {
    let host = session::header(request, "Host")
        .map(str::to_owned)
        .unwrap_or_else(|| ctx.addr.to_string());
    let referrer = session::header(request, "Referer").map(str::to_owned);

    let mut out = SimpleRequest::new(request.method().as_str(), sid, &host, path)
        .with_fragment_param(ctx.session.fragment_param.as_str())
        .with_query(query);
    if let Some(referrer) = referrer {
        out = out.with_referrer(referrer);
    }

    let mut body = String::new();
    request
        .as_reader()
        .read_to_string(&mut body)
        .context("Failed to read request body")?;
    if !body.trim().is_empty() {
        let payload: Value = serde_json::from_str(&body).context("Request body is not JSON")?;
        out = out.with_payload(payload);
    }
    Ok(out)
}

/// Decoded path and raw query of a request URL.
fn split_url(url: &str) -> (String, String) {
    let (path, query) = url.split_once('?').unwrap_or((url, ""));
    let path = percent_decode_str(path).decode_utf8_lossy().into_owned();
    (path, query.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_url() {
        assert_eq!(split_url("/form?stream=1"), ("/form".into(), "stream=1".into()));
        assert_eq!(split_url("/a%20b"), ("/a b".into(), String::new()));
        assert_eq!(split_url("/"), ("/".into(), String::new()));
    }
}
