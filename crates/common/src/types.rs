//! Resource types for dpservice
//!
//! Every resource kind has the same shape: `meta` carries its identity,
//! `spec` the declared configuration and `status` what the service
//! reported back. Values are built fresh for each call and never cached.

use crate::error::Error;
use ipnetwork::IpNetwork;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::str::FromStr;

/// A single resource that can be rendered.
pub trait Object: Serialize {
    /// Kind name, e.g. `Interface`.
    const KIND: &'static str;

    /// Identity shown by the name renderer.
    fn name(&self) -> String;
}

/// Ordered sequence of resources of one kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct List<T> {
    pub items: Vec<T>,
}

impl<T: Object> List<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }

    /// Kind name of the list, e.g. `InterfaceList`.
    pub fn kind() -> String {
        format!("{}List", T::KIND)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Outcome reported by the service for a resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underlay_route: Option<IpAddr>,
    #[serde(default)]
    pub error: u32,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
}

impl Status {
    pub fn with_underlay_route(underlay_route: IpAddr) -> Self {
        Self {
            underlay_route: Some(underlay_route),
            ..Default::default()
        }
    }
}

// ============================================================================
// Interface
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceMeta {
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceSpec {
    pub vni: u32,
    #[serde(default)]
    pub device: String,
    #[serde(default)]
    pub ips: Vec<IpAddr>,
}

/// Virtual interface attached to a VNI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interface {
    pub meta: InterfaceMeta,
    pub spec: InterfaceSpec,
    #[serde(default)]
    pub status: Status,
}

impl Interface {
    pub fn new(id: impl Into<String>, spec: InterfaceSpec) -> Self {
        Self {
            meta: InterfaceMeta { id: id.into() },
            spec,
            status: Status::default(),
        }
    }
}

impl Object for Interface {
    const KIND: &'static str = "Interface";

    fn name(&self) -> String {
        self.meta.id.clone()
    }
}

// ============================================================================
// Virtual IP
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualIpMeta {
    pub interface_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualIpSpec {
    pub ip: IpAddr,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualIp {
    pub meta: VirtualIpMeta,
    pub spec: VirtualIpSpec,
    #[serde(default)]
    pub status: Status,
}

impl VirtualIp {
    pub fn new(interface_id: impl Into<String>, ip: IpAddr) -> Self {
        Self {
            meta: VirtualIpMeta {
                interface_id: interface_id.into(),
            },
            spec: VirtualIpSpec { ip },
            status: Status::default(),
        }
    }
}

impl Object for VirtualIp {
    const KIND: &'static str = "VirtualIP";

    fn name(&self) -> String {
        self.spec.ip.to_string()
    }
}

// ============================================================================
// Prefix
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrefixMeta {
    pub interface_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrefixSpec {
    pub prefix: IpNetwork,
}

/// Prefix routed to an interface, either plain or load-balancer scoped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prefix {
    pub meta: PrefixMeta,
    pub spec: PrefixSpec,
    #[serde(default)]
    pub status: Status,
}

impl Prefix {
    pub fn new(interface_id: impl Into<String>, prefix: IpNetwork) -> Self {
        Self {
            meta: PrefixMeta {
                interface_id: interface_id.into(),
            },
            spec: PrefixSpec { prefix },
            status: Status::default(),
        }
    }
}

impl Object for Prefix {
    const KIND: &'static str = "Prefix";

    fn name(&self) -> String {
        self.spec.prefix.to_string()
    }
}

// ============================================================================
// Route
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteMeta {
    pub vni: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteNextHop {
    pub vni: u32,
    pub ip: IpAddr,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSpec {
    pub prefix: IpNetwork,
    pub next_hop: RouteNextHop,
}

/// Route inside a VNI, identified by its prefix and next hop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub meta: RouteMeta,
    pub spec: RouteSpec,
    #[serde(default)]
    pub status: Status,
}

impl Route {
    pub fn new(vni: u32, prefix: IpNetwork, next_hop_vni: u32, next_hop_ip: IpAddr) -> Self {
        Self {
            meta: RouteMeta { vni },
            spec: RouteSpec {
                prefix,
                next_hop: RouteNextHop {
                    vni: next_hop_vni,
                    ip: next_hop_ip,
                },
            },
            status: Status::default(),
        }
    }
}

impl Object for Route {
    const KIND: &'static str = "Route";

    fn name(&self) -> String {
        format!(
            "{}-{}:{}",
            self.spec.prefix, self.spec.next_hop.vni, self.spec.next_hop.ip
        )
    }
}

// ============================================================================
// Load balancer
// ============================================================================

/// Transport protocol of a load balancer port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Protocol {
    #[serde(rename = "ICMP")]
    Icmp,
    #[serde(rename = "TCP")]
    Tcp,
    #[serde(rename = "UDP")]
    Udp,
    #[serde(rename = "ICMPv6")]
    Icmpv6,
    #[serde(rename = "SCTP")]
    Sctp,
}

impl Protocol {
    /// IANA protocol number.
    pub fn number(self) -> u8 {
        match self {
            Protocol::Icmp => 1,
            Protocol::Tcp => 6,
            Protocol::Udp => 17,
            Protocol::Icmpv6 => 58,
            Protocol::Sctp => 132,
        }
    }

    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(Protocol::Icmp),
            6 => Some(Protocol::Tcp),
            17 => Some(Protocol::Udp),
            58 => Some(Protocol::Icmpv6),
            132 => Some(Protocol::Sctp),
            _ => None,
        }
    }
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Protocol::Icmp => write!(f, "ICMP"),
            Protocol::Tcp => write!(f, "TCP"),
            Protocol::Udp => write!(f, "UDP"),
            Protocol::Icmpv6 => write!(f, "ICMPv6"),
            Protocol::Sctp => write!(f, "SCTP"),
        }
    }
}

impl FromStr for Protocol {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "icmp" => Ok(Protocol::Icmp),
            "tcp" => Ok(Protocol::Tcp),
            "udp" => Ok(Protocol::Udp),
            "icmpv6" => Ok(Protocol::Icmpv6),
            "sctp" => Ok(Protocol::Sctp),
            _ => Err(Error::InvalidRequest(format!("unknown protocol {s:?}"))),
        }
    }
}

/// Protocol/port pair exposed by a load balancer, written `TCP/443`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LbPort {
    pub protocol: Protocol,
    pub port: u16,
}

impl std::fmt::Display for LbPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.protocol, self.port)
    }
}

impl FromStr for LbPort {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (protocol, port) = s
            .trim()
            .split_once('/')
            .ok_or_else(|| Error::InvalidRequest(format!("expected PROTOCOL/PORT, got {s:?}")))?;
        let port = port
            .parse()
            .map_err(|e| Error::InvalidRequest(format!("invalid port in {s:?}: {e}")))?;
        Ok(Self {
            protocol: protocol.parse()?,
            port,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadBalancerMeta {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadBalancerSpec {
    pub vni: u32,
    pub vip: IpAddr,
    #[serde(default)]
    pub ports: Vec<LbPort>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadBalancer {
    pub meta: LoadBalancerMeta,
    pub spec: LoadBalancerSpec,
    #[serde(default)]
    pub status: Status,
}

impl LoadBalancer {
    pub fn new(id: impl Into<String>, spec: LoadBalancerSpec) -> Self {
        Self {
            meta: LoadBalancerMeta { id: id.into() },
            spec,
            status: Status::default(),
        }
    }
}

impl Object for LoadBalancer {
    const KIND: &'static str = "LoadBalancer";

    fn name(&self) -> String {
        self.meta.id.clone()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadBalancerTargetMeta {
    pub load_balancer_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadBalancerTargetSpec {
    pub target_ip: IpAddr,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadBalancerTarget {
    pub meta: LoadBalancerTargetMeta,
    pub spec: LoadBalancerTargetSpec,
    #[serde(default)]
    pub status: Status,
}

impl LoadBalancerTarget {
    pub fn new(load_balancer_id: impl Into<String>, target_ip: IpAddr) -> Self {
        Self {
            meta: LoadBalancerTargetMeta {
                load_balancer_id: load_balancer_id.into(),
            },
            spec: LoadBalancerTargetSpec { target_ip },
            status: Status::default(),
        }
    }
}

impl Object for LoadBalancerTarget {
    const KIND: &'static str = "LoadBalancerTarget";

    fn name(&self) -> String {
        self.spec.target_ip.to_string()
    }
}

// ============================================================================
// NAT
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NatMeta {
    pub interface_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NatSpec {
    pub nat_ip: IpAddr,
    pub min_port: u16,
    pub max_port: u16,
}

/// Port-range NAT of an interface behind a shared NAT IP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nat {
    pub meta: NatMeta,
    pub spec: NatSpec,
    #[serde(default)]
    pub status: Status,
}

impl Nat {
    pub fn new(interface_id: impl Into<String>, spec: NatSpec) -> Self {
        Self {
            meta: NatMeta {
                interface_id: interface_id.into(),
            },
            spec,
            status: Status::default(),
        }
    }
}

impl Object for Nat {
    const KIND: &'static str = "Nat";

    fn name(&self) -> String {
        self.meta.interface_id.clone()
    }
}

/// Which NAT entries to report for a NAT IP.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NatInfoKind {
    #[default]
    Any,
    Local,
    Neighbor,
}

impl std::fmt::Display for NatInfoKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NatInfoKind::Any => write!(f, "any"),
            NatInfoKind::Local => write!(f, "local"),
            NatInfoKind::Neighbor => write!(f, "neighbor"),
        }
    }
}

impl FromStr for NatInfoKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "any" | "0" => Ok(NatInfoKind::Any),
            "local" | "1" => Ok(NatInfoKind::Local),
            "neighbor" | "neigh" | "2" => Ok(NatInfoKind::Neighbor),
            _ => Err(Error::InvalidRequest(format!("unknown NAT info type {s:?}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NatEntryMeta {
    pub nat_ip: IpAddr,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NatEntrySpec {
    pub kind: NatInfoKind,
    /// Interface IP for local entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<IpAddr>,
    pub min_port: u16,
    pub max_port: u16,
    pub vni: u32,
}

/// One NAT translation known to the service for a NAT IP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NatEntry {
    pub meta: NatEntryMeta,
    pub spec: NatEntrySpec,
    #[serde(default)]
    pub status: Status,
}

impl Object for NatEntry {
    const KIND: &'static str = "NatEntry";

    fn name(&self) -> String {
        format!(
            "{}:{}-{}",
            self.meta.nat_ip, self.spec.min_port, self.spec.max_port
        )
    }
}

// ============================================================================
// VNI
// ============================================================================

/// Address family a VNI is queried or reset for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VniKind {
    #[default]
    Ipv4,
    Ipv6,
    Both,
}

impl std::fmt::Display for VniKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VniKind::Ipv4 => write!(f, "ipv4"),
            VniKind::Ipv6 => write!(f, "ipv6"),
            VniKind::Both => write!(f, "both"),
        }
    }
}

impl FromStr for VniKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ipv4" | "0" => Ok(VniKind::Ipv4),
            "ipv6" | "1" => Ok(VniKind::Ipv6),
            "both" | "2" => Ok(VniKind::Both),
            _ => Err(Error::InvalidRequest(format!("unknown VNI type {s:?}"))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VniMeta {
    pub vni: u32,
    pub kind: VniKind,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VniSpec {
    pub in_use: bool,
}

/// Usage of a VNI inside the dataplane.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vni {
    pub meta: VniMeta,
    pub spec: VniSpec,
    #[serde(default)]
    pub status: Status,
}

impl Object for Vni {
    const KIND: &'static str = "Vni";

    fn name(&self) -> String {
        self.meta.vni.to_string()
    }
}

// ============================================================================
// Service information
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionSpec {
    pub client_protocol: String,
    pub client_name: String,
    pub client_version: String,
    #[serde(default)]
    pub service_protocol: String,
    #[serde(default)]
    pub service_version: String,
}

/// Versions exchanged between client and service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    pub spec: VersionSpec,
    #[serde(default)]
    pub status: Status,
}

impl Object for Version {
    const KIND: &'static str = "Version";

    fn name(&self) -> String {
        self.spec.service_version.clone()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitSpec {
    pub uuid: String,
}

/// Initialization state of the service. The UUID changes on every restart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Init {
    pub spec: InitSpec,
    #[serde(default)]
    pub status: Status,
}

impl Object for Init {
    const KIND: &'static str = "Init";

    fn name(&self) -> String {
        self.spec.uuid.clone()
    }
}

// ============================================================================
// Firewall rules
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrafficDirection {
    #[default]
    Ingress,
    Egress,
}

impl std::fmt::Display for TrafficDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrafficDirection::Ingress => write!(f, "ingress"),
            TrafficDirection::Egress => write!(f, "egress"),
        }
    }
}

impl FromStr for TrafficDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ingress" | "in" => Ok(TrafficDirection::Ingress),
            "egress" | "out" => Ok(TrafficDirection::Egress),
            _ => Err(Error::InvalidRequest(format!("unknown traffic direction {s:?}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FirewallAction {
    #[default]
    Accept,
    Drop,
}

impl std::fmt::Display for FirewallAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FirewallAction::Accept => write!(f, "accept"),
            FirewallAction::Drop => write!(f, "drop"),
        }
    }
}

impl FromStr for FirewallAction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "accept" | "allow" => Ok(FirewallAction::Accept),
            "drop" | "deny" => Ok(FirewallAction::Drop),
            _ => Err(Error::InvalidRequest(format!("unknown firewall action {s:?}"))),
        }
    }
}

/// Inclusive port range, written `80` or `8000-8080`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortRange {
    pub lower: u16,
    pub upper: u16,
}

impl std::fmt::Display for PortRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.lower == self.upper {
            write!(f, "{}", self.lower)
        } else {
            write!(f, "{}-{}", self.lower, self.upper)
        }
    }
}

impl FromStr for PortRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse = |port: &str| {
            port.trim()
                .parse::<u16>()
                .map_err(|e| Error::InvalidRequest(format!("invalid port in {s:?}: {e}")))
        };
        let (lower, upper) = match s.split_once('-') {
            Some((lower, upper)) => (parse(lower)?, parse(upper)?),
            None => {
                let port = parse(s)?;
                (port, port)
            }
        };
        if lower > upper {
            return Err(Error::InvalidRequest(format!(
                "port range {s:?} ends before it starts"
            )));
        }
        Ok(Self { lower, upper })
    }
}

/// TCP or UDP ports a rule matches; `None` matches any port.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src_ports: Option<PortRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dst_ports: Option<PortRange>,
}

/// ICMP messages a rule matches; `None` matches any type or code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IcmpFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icmp_type: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icmp_code: Option<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "protocol", rename_all = "lowercase")]
pub enum ProtocolFilter {
    Icmp(IcmpFilter),
    Tcp(PortFilter),
    Udp(PortFilter),
}

impl std::fmt::Display for ProtocolFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProtocolFilter::Icmp(icmp) => {
                write!(f, "icmp")?;
                if let Some(icmp_type) = icmp.icmp_type {
                    write!(f, " type {icmp_type}")?;
                }
                if let Some(icmp_code) = icmp.icmp_code {
                    write!(f, " code {icmp_code}")?;
                }
                Ok(())
            }
            ProtocolFilter::Tcp(ports) | ProtocolFilter::Udp(ports) => {
                let name = if matches!(self, ProtocolFilter::Tcp(_)) {
                    "tcp"
                } else {
                    "udp"
                };
                write!(f, "{name}")?;
                if let Some(src) = ports.src_ports {
                    write!(f, " src {src}")?;
                }
                if let Some(dst) = ports.dst_ports {
                    write!(f, " dst {dst}")?;
                }
                Ok(())
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirewallRuleMeta {
    pub interface_id: String,
    pub rule_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirewallRuleSpec {
    pub direction: TrafficDirection,
    pub action: FirewallAction,
    pub priority: u32,
    pub source_prefix: IpNetwork,
    pub destination_prefix: IpNetwork,
    /// Any protocol when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol_filter: Option<ProtocolFilter>,
}

/// Packet filter rule installed on an interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirewallRule {
    pub meta: FirewallRuleMeta,
    pub spec: FirewallRuleSpec,
    #[serde(default)]
    pub status: Status,
}

impl FirewallRule {
    pub fn new(
        interface_id: impl Into<String>,
        rule_id: impl Into<String>,
        spec: FirewallRuleSpec,
    ) -> Self {
        Self {
            meta: FirewallRuleMeta {
                interface_id: interface_id.into(),
                rule_id: rule_id.into(),
            },
            spec,
            status: Status::default(),
        }
    }
}

impl Object for FirewallRule {
    const KIND: &'static str = "FirewallRule";

    fn name(&self) -> String {
        self.meta.rule_id.clone()
    }
}
