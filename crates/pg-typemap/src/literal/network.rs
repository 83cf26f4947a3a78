//! `inet`, `cidr`, `macaddr` and `macaddr8`.

use crate::core::{IpNetwork, MacAddress, Value};
use crate::error::Result;

use super::{unquote_keyword, wrong_shape, LiteralFormatter};

/// `INET '192.168.1.1'` or `CIDR '10.0.0.0/8'`.
#[derive(Debug, Clone, Copy)]
pub struct InetFormatter {
    cidr: bool,
}

impl InetFormatter {
    pub fn inet() -> Self {
        Self { cidr: false }
    }

    pub fn cidr() -> Self {
        Self { cidr: true }
    }

    fn keyword(&self) -> &'static str {
        if self.cidr {
            "CIDR"
        } else {
            "INET"
        }
    }

    fn text(&self, value: &Value) -> Result<String> {
        match (value, self.cidr) {
            (Value::Inet(net), false) => Ok(net.to_string()),
            // cidr always shows the prefix, even for a full-length mask.
            (Value::Cidr(net), true) => Ok(format!("{}/{}", net.addr(), net.prefix_len())),
            (other, _) => Err(wrong_shape(self.family(), other)),
        }
    }
}

impl LiteralFormatter for InetFormatter {
    fn family(&self) -> &str {
        if self.cidr {
            "cidr"
        } else {
            "inet"
        }
    }

    fn format(&self, value: &Value, _store_type: &str) -> Result<String> {
        Ok(format!("{} '{}'", self.keyword(), self.text(value)?))
    }

    fn format_embedded(&self, value: &Value, _store_type: &str) -> Result<String> {
        self.text(value)
    }

    fn parse(&self, literal: &str, _store_type: &str) -> Result<Value> {
        let text = unquote_keyword(literal, self.keyword(), self.family())?;
        let net: IpNetwork = text.parse()?;
        Ok(if self.cidr {
            Value::Cidr(net)
        } else {
            Value::Inet(net)
        })
    }
}

/// `MACADDR '08002B010203'` or `MACADDR8 '08002B0102030405'`.
#[derive(Debug, Clone, Copy)]
pub struct MacAddrFormatter {
    eui64: bool,
}

impl MacAddrFormatter {
    pub fn macaddr() -> Self {
        Self { eui64: false }
    }

    pub fn macaddr8() -> Self {
        Self { eui64: true }
    }

    fn keyword(&self) -> &'static str {
        if self.eui64 {
            "MACADDR8"
        } else {
            "MACADDR"
        }
    }
}

impl LiteralFormatter for MacAddrFormatter {
    fn family(&self) -> &str {
        if self.eui64 {
            "macaddr8"
        } else {
            "macaddr"
        }
    }

    fn format(&self, value: &Value, store_type: &str) -> Result<String> {
        Ok(format!(
            "{} '{}'",
            self.keyword(),
            self.format_embedded(value, store_type)?
        ))
    }

    fn format_embedded(&self, value: &Value, _store_type: &str) -> Result<String> {
        match value {
            Value::MacAddr(mac) => Ok(mac.to_string()),
            other => Err(wrong_shape(self.family(), other)),
        }
    }

    fn parse(&self, literal: &str, _store_type: &str) -> Result<Value> {
        let text = unquote_keyword(literal, self.keyword(), self.family())?;
        let mac: MacAddress = text.parse()?;
        Ok(Value::MacAddr(mac))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inet_and_cidr() {
        let host: IpNetwork = "192.168.1.1".parse().unwrap();
        assert_eq!(
            InetFormatter::inet().format(&Value::Inet(host), "inet").unwrap(),
            "INET '192.168.1.1'"
        );
        assert_eq!(
            InetFormatter::cidr().format(&Value::Cidr(host), "cidr").unwrap(),
            "CIDR '192.168.1.1/32'"
        );
        assert!(InetFormatter::cidr().format(&Value::Inet(host), "cidr").is_err());
    }

    #[test]
    fn test_macaddr_round_trip() {
        let f = MacAddrFormatter::macaddr();
        let mac: MacAddress = "08:00:2b:01:02:03".parse().unwrap();
        let literal = f.format(&Value::MacAddr(mac.clone()), "macaddr").unwrap();
        assert_eq!(literal, "MACADDR '08002B010203'");
        assert_eq!(f.parse(&literal, "macaddr").unwrap(), Value::MacAddr(mac));
    }
}
