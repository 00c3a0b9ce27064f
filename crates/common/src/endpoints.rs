//! Static catalog of authenticated IPFS gateways and remote pinning services

use url::Url;

/// An immutable catalog entry: a gateway or pinner the UI can select
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub name: &'static str,
    pub location: &'static str,
    pub url: &'static str,
}

impl Endpoint {
    /// The parsed form of the endpoint URL
    pub fn to_url(&self) -> Url {
        Url::parse(self.url).expect("static endpoint URL is valid")
    }
}

/// Authenticated IPFS gateways accepting uploads
pub fn gateways() -> Vec<Endpoint> {
    vec![
        Endpoint {
            name: "Crust Network",
            location: "Shanghai",
            url: "https://crustipfs.xyz",
        },
        Endpoint {
            name: "DCF",
            location: "Singapore",
            url: "https://crustwebsites.net",
        },
        Endpoint {
            name: "Crust IPFS GW",
            location: "Berlin",
            url: "https://ipfs-gw.decloud.foundation",
        },
    ]
}

/// Remote pinning services
pub fn pinners() -> Vec<Endpoint> {
    vec![Endpoint {
        name: "Crust Pinner",
        location: "Global",
        url: "https://pinning-service.decoo-cloud.cn",
    }]
}
