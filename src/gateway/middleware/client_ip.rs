use axum::extract::ConnectInfo;
use std::net::SocketAddr;

/// Socket peer address only; forwarded headers are attacker-controlled and
/// never consulted.
pub fn extract_client_ip(connect_info: Option<&ConnectInfo<SocketAddr>>) -> Option<String> {
    connect_info.map(|info| info.0.ip().to_string())
}

#[cfg(test)]
mod tests {
    use super::extract_client_ip;
    use axum::extract::ConnectInfo;
    use std::net::{IpAddr, Ipv4Addr, SocketAddr};

    #[test]
    fn returns_socket_ip_when_connect_info_present() {
        let socket = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(10, 1, 2, 3)), 8080);
        assert_eq!(
            extract_client_ip(Some(&ConnectInfo(socket))),
            Some("10.1.2.3".to_string())
        );
    }

    #[test]
    fn returns_none_without_connect_info() {
        assert_eq!(extract_client_ip(None), None);
    }
}
