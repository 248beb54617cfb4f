//! Tests for the Redis notifier that need no running Redis server
//!
//! Connection handling is exercised against a tiny in-process server that
//! speaks just enough RESP for a MULTI/RPUSH/EXEC transaction.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::OwnedReadHalf;
use tokio::net::{TcpListener, TcpStream};

use core_kernel::PortError;
use domain_billing::{Bill, BillEvent, BillNotification, BillNotifier, BillStatus};
use infra_queue::{encode_notification, RedisBillNotifier, RedisNotifierConfig, DEFAULT_QUEUE};

fn notification(event: BillEvent) -> BillNotification {
    let mut bill = Bill::issue("user-42", BillStatus::Pending, 300);
    if event == BillEvent::StatusUpdated {
        bill.bill_status = BillStatus::Paid;
        bill.paid_at = BillStatus::Paid.settlement_time(Utc::now());
    }
    BillNotification::new(event, bill)
}

#[test]
fn test_payload_carries_public_bill_fields() {
    let message = notification(BillEvent::StatusUpdated);
    let payload = encode_notification(&message).unwrap();
    let json: serde_json::Value = serde_json::from_str(&payload).unwrap();

    assert_eq!(json["id"], message.id.to_string());
    assert_eq!(json["event"], "status_updated");
    assert_eq!(json["bill"]["uuid"], message.bill.uuid.to_string());
    assert_eq!(json["bill"]["userUuid"], "user-42");
    assert_eq!(json["bill"]["billStatus"], "Paid");
    assert_eq!(json["bill"]["amount"], 300);
    assert!(json["bill"]["paidAt"].is_string());
    assert!(json["occurredAt"].is_string());
}

#[test]
fn test_payload_decodes_back() {
    let message = notification(BillEvent::Created);
    let payload = encode_notification(&message).unwrap();
    let decoded: BillNotification = serde_json::from_str(&payload).unwrap();
    assert_eq!(decoded, message);
}

#[test]
fn test_invalid_url_is_rejected_up_front() {
    let result = RedisBillNotifier::new(RedisNotifierConfig::new("not a url"));
    assert!(matches!(result, Err(PortError::Internal { .. })));
}

#[test]
fn test_new_does_not_connect() {
    let notifier = RedisBillNotifier::new(RedisNotifierConfig::new("redis://127.0.0.1:1")).unwrap();
    assert!(!notifier.is_connected());
    assert_eq!(notifier.queues(), [DEFAULT_QUEUE.to_string()]);
}

#[tokio::test]
async fn test_unreachable_server_is_a_connection_error() {
    let notifier = RedisBillNotifier::new(RedisNotifierConfig::new("redis://127.0.0.1:1")).unwrap();

    let result = notifier.notify(&notification(BillEvent::Created)).await;

    assert!(result.unwrap_err().is_transient());
    assert!(!notifier.is_connected());
}

/// Starts a RESP server that closes its first connection right after the
/// first transaction it answers; later connections stay up
async fn start_dropping_server() -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let connections = Arc::new(AtomicUsize::new(0));

    let accepted = connections.clone();
    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            let first = accepted.fetch_add(1, Ordering::SeqCst) == 0;
            tokio::spawn(serve(socket, first));
        }
    });

    (format!("redis://{}", addr), connections)
}

async fn serve(socket: TcpStream, close_after_exec: bool) {
    let (read, mut write) = socket.into_split();
    let mut reader = BufReader::new(read);
    let mut queued = 0usize;

    while let Some(command) = read_command(&mut reader).await {
        let reply = match command.as_str() {
            "MULTI" => {
                queued = 0;
                "+OK\r\n".to_string()
            }
            "RPUSH" => {
                queued += 1;
                "+QUEUED\r\n".to_string()
            }
            "EXEC" => format!("*{}\r\n{}", queued, ":1\r\n".repeat(queued)),
            _ => "+OK\r\n".to_string(),
        };
        if write.write_all(reply.as_bytes()).await.is_err() {
            return;
        }
        if close_after_exec && command == "EXEC" {
            return;
        }
    }
}

/// Reads one RESP array of bulk strings and returns its upper-cased command name
async fn read_command(reader: &mut BufReader<OwnedReadHalf>) -> Option<String> {
    let mut line = String::new();
    if reader.read_line(&mut line).await.ok()? == 0 {
        return None;
    }
    let parts: usize = line.trim_end().strip_prefix('*')?.parse().ok()?;

    let mut name = None;
    for _ in 0..parts {
        line.clear();
        reader.read_line(&mut line).await.ok()?;
        let len: usize = line.trim_end().strip_prefix('$')?.parse().ok()?;
        let mut data = vec![0u8; len + 2];
        reader.read_exact(&mut data).await.ok()?;
        if name.is_none() {
            name = Some(String::from_utf8_lossy(&data[..len]).to_ascii_uppercase());
        }
    }
    name
}

#[tokio::test]
async fn test_notifier_redials_after_server_drops_connection() {
    let (url, connections) = start_dropping_server().await;
    let notifier = RedisBillNotifier::new(RedisNotifierConfig::new(url)).unwrap();
    let message = notification(BillEvent::Created);

    notifier.notify(&message).await.unwrap();
    assert!(notifier.is_connected());
    assert_eq!(connections.load(Ordering::SeqCst), 1);

    // The command that notices the drop may fail; a later one must get through.
    let mut delivered = false;
    for _ in 0..10 {
        if notifier.notify(&message).await.is_ok() {
            delivered = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    assert!(delivered);
    assert!(connections.load(Ordering::SeqCst) >= 2);
}
