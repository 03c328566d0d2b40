//! 单次 HTTP over UDP 交换演示
//!
//! 构造一个 HTTP 请求，沿协议链封装成 UDP 段流再解封装还原，
//! 打印各阶段的字节统计。

use clap::Parser;
use netsim_rs::addr::Port;
use netsim_rs::pdu::{HttpMethod, HttpRequest, Pdu};
use netsim_rs::proto::UdpProtocol;
use netsim_rs::stack::ChainBuilder;
use tracing::{debug, info};

#[derive(Debug, Parser)]
#[command(
    name = "http-over-udp",
    about = "单次 HTTP over UDP 交换：封装、解封装并校验往返"
)]
struct Args {
    /// 每段最大载荷字节数
    #[arg(long, default_value_t = 4)]
    mss: usize,
    /// 源端口（十进制字符串，0–65535）
    #[arg(long, default_value = "4040")]
    source_port: String,
    /// 目的端口
    #[arg(long, default_value = "8080")]
    destination_port: String,
    #[arg(long, default_value = "www.example.com")]
    host: String,
    #[arg(long, default_value = "/index.html")]
    path: String,
    /// 请求体；非空时按 POST 发送
    #[arg(long, default_value = "")]
    body: String,
}

fn main() {
    // 初始化 tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .init();

    let args = Args::parse();

    let source: Port = args.source_port.parse().expect("parse source port");
    let destination: Port = args
        .destination_port
        .parse()
        .expect("parse destination port");

    let method = if args.body.is_empty() {
        HttpMethod::Get
    } else {
        HttpMethod::Post
    };
    let request = HttpRequest::new(
        method,
        args.path.clone(),
        args.host.clone(),
        args.body.clone().into_bytes(),
    )
    .expect("build http request");

    let udp = UdpProtocol::new(args.mss, source, destination).expect("build udp layer");
    let chain = ChainBuilder::new()
        .push(Box::new(udp))
        .build()
        .expect("build chain");

    info!("📦 构造 HTTP 请求并进入协议链");
    let payload = request.to_bytes();
    debug!(payload_bytes = payload.len(), mss = args.mss, "请求载荷");

    let wire = chain.transmit(&payload).expect("encapsulate");
    let restored = chain.receive(&wire).expect("decapsulate");

    let segments = payload.len().div_ceil(args.mss);
    if restored == payload {
        info!("✅ 往返校验通过");
    } else {
        info!("❌ 往返校验失败");
    }

    println!(
        "payload_bytes={} wire_bytes={} segments={} header_overhead={} round_trip_ok={}",
        payload.len(),
        wire.len(),
        segments,
        wire.len() - payload.len(),
        restored == payload
    );
}
