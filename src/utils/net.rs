use std::net::{IpAddr, Ipv4Addr, UdpSocket};

// UDP connect 不會真的送封包，只是讓 OS 選出對外網卡
pub fn local_ip() -> IpAddr {
    probe().unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST))
}

fn probe() -> std::io::Result<IpAddr> {
    let sock = UdpSocket::bind("0.0.0.0:0")?;
    sock.connect("8.8.8.8:80")?;
    Ok(sock.local_addr()?.ip())
}

pub fn server_url(ip: IpAddr, port: u16) -> String {
    match ip {
        IpAddr::V6(v6) => format!("http://[{v6}]:{port}"),
        IpAddr::V4(v4) => format!("http://{v4}:{port}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_shapes() {
        assert_eq!(server_url(IpAddr::from([192, 168, 1, 20]), 5000), "http://192.168.1.20:5000");
        assert_eq!(server_url("::1".parse().unwrap(), 80), "http://[::1]:80");
    }

    #[test]
    fn local_ip_never_panics() {
        let _ = local_ip();
    }
}
