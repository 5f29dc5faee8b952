//! Mapping between resource types and wire messages
//!
//! Every IP-bearing wire field gets its version tag from the address
//! itself. Decoding checks the tag against the parsed address and fails
//! with [`Error::Decode`] on any disagreement, so a tag/address mismatch
//! never reaches the caller.

use dpservice_common::ip::{find_ipv4, find_ipv6};
use dpservice_common::{
    Error, FirewallAction, FirewallRule, FirewallRuleMeta, FirewallRuleSpec, IcmpFilter, Init,
    InitSpec, Interface, InterfaceMeta, InterfaceSpec, IpFamily, LbPort, LoadBalancer,
    LoadBalancerMeta, LoadBalancerSpec, LoadBalancerTarget, Nat, NatEntry, NatEntryMeta,
    NatEntrySpec, NatInfoKind, NatMeta, NatSpec, PortFilter, PortRange, Prefix, Protocol,
    ProtocolFilter, Result, Route, Status, TrafficDirection, VersionSpec, VirtualIp, Vni,
    VniKind, VniMeta, VniSpec,
};
use ipnetwork::IpNetwork;
use std::net::IpAddr;

use crate::proto;

/// Weight attached to every route on add and delete.
pub const ROUTE_WEIGHT: u32 = 100;

/// Protocol version announced by this client.
pub const PROTOCOL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Wildcard for ICMP type/code and port bounds in firewall filters.
const ANY: i32 = -1;

// ============================================================================
// Scalars
// ============================================================================

fn version_of(family: IpFamily) -> proto::IpVersion {
    match family {
        IpFamily::Ipv4 => proto::IpVersion::Ipv4,
        IpFamily::Ipv6 => proto::IpVersion::Ipv6,
    }
}

pub fn ip_version(addr: &IpAddr) -> proto::IpVersion {
    version_of(IpFamily::of(addr))
}

fn family_of_version(field: &'static str, version: i32) -> Result<IpFamily> {
    match proto::IpVersion::try_from(version) {
        Ok(proto::IpVersion::Ipv4) => Ok(IpFamily::Ipv4),
        Ok(proto::IpVersion::Ipv6) => Ok(IpFamily::Ipv6),
        Err(_) => Err(Error::decode(field, format!("unknown IP version {version}"))),
    }
}

pub fn encode_id(id: &str) -> Vec<u8> {
    id.as_bytes().to_vec()
}

pub fn decode_id(field: &'static str, id: &[u8]) -> Result<String> {
    String::from_utf8(id.to_vec()).map_err(|e| Error::decode(field, e))
}

fn encode_addr(addr: &IpAddr) -> Vec<u8> {
    addr.to_string().into_bytes()
}

fn parse_addr(field: &'static str, address: &[u8]) -> Result<IpAddr> {
    let text = std::str::from_utf8(address).map_err(|e| Error::decode(field, e))?;
    text.parse()
        .map_err(|e| Error::decode(field, format!("{text:?}: {e}")))
}

/// Parse a tagged address, rejecting a tag that disagrees with the address.
pub fn decode_addr(field: &'static str, version: i32, address: &[u8]) -> Result<IpAddr> {
    let addr = parse_addr(field, address)?;
    let tagged = family_of_version(field, version)?;
    if IpFamily::of(&addr) != tagged {
        return Err(Error::decode(field, format!("{addr} is tagged as {tagged}")));
    }
    Ok(addr)
}

/// Parse an address carried in a field that only holds one family.
fn decode_addr_of_family(field: &'static str, family: IpFamily, address: &[u8]) -> Result<IpAddr> {
    let addr = parse_addr(field, address)?;
    if IpFamily::of(&addr) != family {
        return Err(Error::decode(field, format!("{addr} is not an {family} address")));
    }
    Ok(addr)
}

/// Underlay route assigned by a create call; it must be present and valid.
pub fn underlay_route(route: &[u8]) -> Result<IpAddr> {
    parse_addr("underlay route", route)
}

/// Underlay route reported by get/list calls; empty means not assigned.
pub fn optional_underlay_route(route: &[u8]) -> Result<Option<IpAddr>> {
    if route.is_empty() {
        return Ok(None);
    }
    underlay_route(route).map(Some)
}

fn decode_port(field: &'static str, port: u32) -> Result<u16> {
    u16::try_from(port).map_err(|_| Error::decode(field, format!("port {port} out of range")))
}

// ============================================================================
// Tagged addresses
// ============================================================================

pub fn lb_ip(addr: &IpAddr) -> proto::LbIp {
    proto::LbIp {
        ip_version: ip_version(addr) as i32,
        address: encode_addr(addr),
    }
}

pub fn nat_ip(addr: &IpAddr) -> proto::NatIp {
    proto::NatIp {
        ip_version: ip_version(addr) as i32,
        address: encode_addr(addr),
    }
}

pub fn vip_ip(addr: &IpAddr) -> proto::InterfaceVipIp {
    proto::InterfaceVipIp {
        ip_version: ip_version(addr) as i32,
        address: encode_addr(addr),
    }
}

pub fn ip_config(addr: Option<IpAddr>) -> Option<proto::IpConfig> {
    addr.map(|addr| proto::IpConfig {
        ip_version: ip_version(&addr) as i32,
        primary_address: encode_addr(&addr),
    })
}

/// Prefixes travel as their address (without length) plus the length.
pub fn prefix(net: &IpNetwork) -> proto::Prefix {
    proto::Prefix {
        ip_version: version_of(IpFamily::of_network(net)) as i32,
        address: encode_addr(&net.ip()),
        prefix_length: u32::from(net.prefix()),
    }
}

pub fn decode_prefix(field: &'static str, prefix: &proto::Prefix) -> Result<IpNetwork> {
    network(field, prefix.ip_version, &prefix.address, prefix.prefix_length)
}

fn network(field: &'static str, version: i32, address: &[u8], length: u32) -> Result<IpNetwork> {
    let addr = decode_addr(field, version, address)?;
    let length = u8::try_from(length)
        .map_err(|_| Error::decode(field, format!("prefix length {length} out of range")))?;
    IpNetwork::new(addr, length).map_err(|e| Error::decode(field, e))
}

pub fn interface_id_msg(interface_id: &str) -> proto::InterfaceIdMsg {
    proto::InterfaceIdMsg {
        interface_id: encode_id(interface_id),
    }
}

// ============================================================================
// Resources
// ============================================================================

pub fn create_interface_request(iface: &Interface) -> proto::CreateInterfaceRequest {
    proto::CreateInterfaceRequest {
        interface_type: proto::InterfaceType::VirtualInterface as i32,
        interface_id: encode_id(&iface.meta.id),
        vni: iface.spec.vni,
        ipv4_config: ip_config(find_ipv4(&iface.spec.ips).map(IpAddr::V4)),
        ipv6_config: ip_config(find_ipv6(&iface.spec.ips).map(IpAddr::V6)),
        device_name: iface.spec.device.clone(),
    }
}

pub fn interface_from_proto(iface: &proto::Interface) -> Result<Interface> {
    let mut ips = Vec::with_capacity(2);
    if !iface.primary_ipv4_address.is_empty() {
        ips.push(decode_addr_of_family(
            "primary IPv4 address",
            IpFamily::Ipv4,
            &iface.primary_ipv4_address,
        )?);
    }
    if !iface.primary_ipv6_address.is_empty() {
        ips.push(decode_addr_of_family(
            "primary IPv6 address",
            IpFamily::Ipv6,
            &iface.primary_ipv6_address,
        )?);
    }

    Ok(Interface {
        meta: InterfaceMeta {
            id: decode_id("interface ID", &iface.interface_id)?,
        },
        spec: InterfaceSpec {
            vni: iface.vni,
            device: iface.pci_dp_name.clone(),
            ips,
        },
        status: Status {
            underlay_route: optional_underlay_route(&iface.underlay_route)?,
            ..Default::default()
        },
    })
}

pub fn virtual_ip_from_proto(interface_id: &str, vip: &proto::GetVipResponse) -> Result<VirtualIp> {
    let mut virtual_ip = VirtualIp::new(
        interface_id,
        decode_addr("virtual IP", vip.ip_version, &vip.address)?,
    );
    virtual_ip.status.underlay_route = optional_underlay_route(&vip.underlay_route)?;
    Ok(virtual_ip)
}

pub fn prefix_from_proto(interface_id: &str, wire: &proto::Prefix) -> Result<Prefix> {
    Ok(Prefix::new(interface_id, decode_prefix("prefix", wire)?))
}

pub fn lb_prefix_from_proto(interface_id: &str, wire: &proto::LbPrefix) -> Result<Prefix> {
    let net = network(
        "load balancer prefix",
        wire.ip_version,
        &wire.address,
        wire.prefix_length,
    )?;
    let mut prefix = Prefix::new(interface_id, net);
    prefix.status.underlay_route = optional_underlay_route(&wire.underlay_route)?;
    Ok(prefix)
}

pub fn route(prefix_net: &IpNetwork, next_hop_vni: u32, next_hop_ip: &IpAddr) -> proto::Route {
    proto::Route {
        ip_version: ip_version(next_hop_ip) as i32,
        prefix: Some(prefix(prefix_net)),
        nexthop_vni: next_hop_vni,
        nexthop_address: encode_addr(next_hop_ip),
        weight: ROUTE_WEIGHT,
    }
}

pub fn vni_route_msg(
    vni: u32,
    prefix_net: &IpNetwork,
    next_hop_vni: u32,
    next_hop_ip: &IpAddr,
) -> proto::VniRouteMsg {
    proto::VniRouteMsg {
        vni: Some(proto::VniMsg { vni }),
        route: Some(route(prefix_net, next_hop_vni, next_hop_ip)),
    }
}

pub fn route_from_proto(vni: u32, wire: &proto::Route) -> Result<Route> {
    let prefix = wire
        .prefix
        .as_ref()
        .ok_or_else(|| Error::decode("route prefix", "missing"))?;
    Ok(Route::new(
        vni,
        decode_prefix("route prefix", prefix)?,
        wire.nexthop_vni,
        decode_addr("next hop address", wire.ip_version, &wire.nexthop_address)?,
    ))
}

fn protocol_from_proto(value: i32) -> Result<Protocol> {
    u8::try_from(value)
        .ok()
        .and_then(Protocol::from_number)
        .ok_or_else(|| Error::decode("load balancer port", format!("unknown protocol {value}")))
}

pub fn lb_port(port: &LbPort) -> proto::LbPort {
    proto::LbPort {
        port: u32::from(port.port),
        protocol: i32::from(port.protocol.number()),
    }
}

pub fn lb_port_from_proto(port: &proto::LbPort) -> Result<LbPort> {
    Ok(LbPort {
        protocol: protocol_from_proto(port.protocol)?,
        port: decode_port("load balancer port", port.port)?,
    })
}

pub fn create_load_balancer_request(lb: &LoadBalancer) -> proto::CreateLoadBalancerRequest {
    proto::CreateLoadBalancerRequest {
        load_balancer_id: encode_id(&lb.meta.id),
        vni: lb.spec.vni,
        lb_vip_ip: Some(lb_ip(&lb.spec.vip)),
        lbports: lb.spec.ports.iter().map(lb_port).collect(),
    }
}

pub fn load_balancer_from_proto(id: &str, wire: &proto::GetLoadBalancerResponse) -> Result<LoadBalancer> {
    let vip = wire
        .lb_vip_ip
        .as_ref()
        .ok_or_else(|| Error::decode("load balancer VIP", "missing"))?;
    let ports = wire
        .lbports
        .iter()
        .map(lb_port_from_proto)
        .collect::<Result<Vec<_>>>()?;

    Ok(LoadBalancer {
        meta: LoadBalancerMeta { id: id.to_string() },
        spec: LoadBalancerSpec {
            vni: wire.vni,
            vip: decode_addr("load balancer VIP", vip.ip_version, &vip.address)?,
            ports,
        },
        status: Status {
            underlay_route: optional_underlay_route(&wire.underlay_route)?,
            ..Default::default()
        },
    })
}

pub fn load_balancer_target_from_proto(lb_id: &str, target: &proto::LbIp) -> Result<LoadBalancerTarget> {
    Ok(LoadBalancerTarget::new(
        lb_id,
        decode_addr("load balancer target", target.ip_version, &target.address)?,
    ))
}

pub fn add_nat_request(nat: &Nat) -> proto::AddNatRequest {
    proto::AddNatRequest {
        interface_id: encode_id(&nat.meta.interface_id),
        nat_vip_ip: Some(nat_ip(&nat.spec.nat_ip)),
        min_port: u32::from(nat.spec.min_port),
        max_port: u32::from(nat.spec.max_port),
    }
}

pub fn nat_from_proto(interface_id: &str, wire: &proto::GetNatResponse) -> Result<Nat> {
    let ip = wire
        .nat_vip_ip
        .as_ref()
        .ok_or_else(|| Error::decode("NAT IP", "missing"))?;

    Ok(Nat {
        meta: NatMeta {
            interface_id: interface_id.to_string(),
        },
        spec: NatSpec {
            nat_ip: decode_addr("NAT IP", ip.ip_version, &ip.address)?,
            min_port: decode_port("NAT min port", wire.min_port)?,
            max_port: decode_port("NAT max port", wire.max_port)?,
        },
        status: Status {
            underlay_route: optional_underlay_route(&wire.underlay_route)?,
            ..Default::default()
        },
    })
}

pub fn nat_info_type(kind: NatInfoKind) -> proto::NatInfoType {
    match kind {
        NatInfoKind::Any => proto::NatInfoType::Any,
        NatInfoKind::Local => proto::NatInfoType::Local,
        NatInfoKind::Neighbor => proto::NatInfoType::Neighbor,
    }
}

fn nat_info_kind(value: i32) -> Result<NatInfoKind> {
    match proto::NatInfoType::try_from(value) {
        Ok(proto::NatInfoType::Any) => Ok(NatInfoKind::Any),
        Ok(proto::NatInfoType::Local) => Ok(NatInfoKind::Local),
        Ok(proto::NatInfoType::Neighbor) => Ok(NatInfoKind::Neighbor),
        Err(_) => Err(Error::decode("NAT info type", format!("unknown type {value}"))),
    }
}

pub fn nat_entry_from_proto(nat_ip: IpAddr, entry: &proto::NatInfoEntry) -> Result<NatEntry> {
    let ip = if entry.address.is_empty() {
        None
    } else {
        Some(decode_addr("NAT entry address", entry.ip_version, &entry.address)?)
    };

    Ok(NatEntry {
        meta: NatEntryMeta { nat_ip },
        spec: NatEntrySpec {
            kind: nat_info_kind(entry.nat_info_type)?,
            ip,
            min_port: decode_port("NAT entry min port", entry.min_port)?,
            max_port: decode_port("NAT entry max port", entry.max_port)?,
            vni: entry.vni,
        },
        status: Status {
            underlay_route: optional_underlay_route(&entry.underlay_route)?,
            ..Default::default()
        },
    })
}

// ============================================================================
// Service information and VNIs
// ============================================================================

pub fn get_version_request(client_name: &str, client_version: &str) -> proto::GetVersionRequest {
    proto::GetVersionRequest {
        client_protocol: PROTOCOL_VERSION.to_string(),
        client_name: client_name.to_string(),
        client_version: client_version.to_string(),
    }
}

pub fn version_spec(request: &proto::GetVersionRequest, wire: &proto::GetVersionResponse) -> VersionSpec {
    VersionSpec {
        client_protocol: request.client_protocol.clone(),
        client_name: request.client_name.clone(),
        client_version: request.client_version.clone(),
        service_protocol: wire.service_protocol.clone(),
        service_version: wire.service_version.clone(),
    }
}

/// The UUID identifies one run of the service, so an empty one is never valid.
pub fn init_from_uuid(uuid: &str) -> Result<Init> {
    if uuid.is_empty() {
        return Err(Error::decode("service UUID", "missing from response"));
    }
    Ok(Init {
        spec: InitSpec {
            uuid: uuid.to_string(),
        },
        status: Status::default(),
    })
}

pub fn vni_type(kind: VniKind) -> proto::VniType {
    match kind {
        VniKind::Ipv4 => proto::VniType::Ipv4,
        VniKind::Ipv6 => proto::VniType::Ipv6,
        VniKind::Both => proto::VniType::Both,
    }
}

pub fn vni_from_proto(vni: u32, kind: VniKind, wire: &proto::IsVniInUseResponse) -> Vni {
    Vni {
        meta: VniMeta { vni, kind },
        spec: VniSpec {
            in_use: wire.in_use,
        },
        status: Status::default(),
    }
}

// ============================================================================
// Firewall rules
// ============================================================================

fn port_bounds(range: Option<PortRange>) -> (i32, i32) {
    match range {
        Some(range) => (i32::from(range.lower), i32::from(range.upper)),
        None => (ANY, ANY),
    }
}

fn icmp_value(value: Option<u8>) -> i32 {
    value.map(i32::from).unwrap_or(ANY)
}

fn port_filter(ports: &PortFilter) -> proto::PortFilter {
    let (src_port_lower, src_port_upper) = port_bounds(ports.src_ports);
    let (dst_port_lower, dst_port_upper) = port_bounds(ports.dst_ports);
    proto::PortFilter {
        src_port_lower,
        src_port_upper,
        dst_port_lower,
        dst_port_upper,
    }
}

pub fn protocol_filter(filter: &ProtocolFilter) -> proto::ProtocolFilter {
    use proto::protocol_filter::Filter;

    let filter = match filter {
        ProtocolFilter::Icmp(icmp) => Filter::Icmp(proto::IcmpFilter {
            icmp_type: icmp_value(icmp.icmp_type),
            icmp_code: icmp_value(icmp.icmp_code),
        }),
        ProtocolFilter::Tcp(ports) => Filter::Tcp(port_filter(ports)),
        ProtocolFilter::Udp(ports) => Filter::Udp(port_filter(ports)),
    };
    proto::ProtocolFilter {
        filter: Some(filter),
    }
}

fn decode_port_range(field: &'static str, lower: i32, upper: i32) -> Result<Option<PortRange>> {
    if lower == ANY && upper == ANY {
        return Ok(None);
    }
    let bound = |port: i32| {
        u16::try_from(port).map_err(|_| Error::decode(field, format!("port {port} out of range")))
    };
    let range = PortRange {
        lower: bound(lower)?,
        upper: bound(upper)?,
    };
    if range.lower > range.upper {
        return Err(Error::decode(field, format!("{lower}-{upper} is not a range")));
    }
    Ok(Some(range))
}

fn decode_icmp_value(field: &'static str, value: i32) -> Result<Option<u8>> {
    if value == ANY {
        return Ok(None);
    }
    u8::try_from(value)
        .map(Some)
        .map_err(|_| Error::decode(field, format!("{value} out of range")))
}

fn decode_port_filter(ports: &proto::PortFilter) -> Result<PortFilter> {
    Ok(PortFilter {
        src_ports: decode_port_range("source ports", ports.src_port_lower, ports.src_port_upper)?,
        dst_ports: decode_port_range(
            "destination ports",
            ports.dst_port_lower,
            ports.dst_port_upper,
        )?,
    })
}

/// A message without a filter matches every protocol.
pub fn protocol_filter_from_proto(
    wire: Option<&proto::ProtocolFilter>,
) -> Result<Option<ProtocolFilter>> {
    use proto::protocol_filter::Filter;

    let filter = match wire.and_then(|f| f.filter.as_ref()) {
        None => return Ok(None),
        Some(Filter::Icmp(icmp)) => ProtocolFilter::Icmp(IcmpFilter {
            icmp_type: decode_icmp_value("ICMP type", icmp.icmp_type)?,
            icmp_code: decode_icmp_value("ICMP code", icmp.icmp_code)?,
        }),
        Some(Filter::Tcp(ports)) => ProtocolFilter::Tcp(decode_port_filter(ports)?),
        Some(Filter::Udp(ports)) => ProtocolFilter::Udp(decode_port_filter(ports)?),
    };
    Ok(Some(filter))
}

pub fn traffic_direction(direction: TrafficDirection) -> proto::TrafficDirection {
    match direction {
        TrafficDirection::Ingress => proto::TrafficDirection::Ingress,
        TrafficDirection::Egress => proto::TrafficDirection::Egress,
    }
}

fn traffic_direction_from_proto(value: i32) -> Result<TrafficDirection> {
    match proto::TrafficDirection::try_from(value) {
        Ok(proto::TrafficDirection::Ingress) => Ok(TrafficDirection::Ingress),
        Ok(proto::TrafficDirection::Egress) => Ok(TrafficDirection::Egress),
        Err(_) => Err(Error::decode("traffic direction", format!("unknown direction {value}"))),
    }
}

pub fn firewall_action(action: FirewallAction) -> proto::FirewallAction {
    match action {
        FirewallAction::Accept => proto::FirewallAction::Accept,
        FirewallAction::Drop => proto::FirewallAction::Drop,
    }
}

fn firewall_action_from_proto(value: i32) -> Result<FirewallAction> {
    match proto::FirewallAction::try_from(value) {
        Ok(proto::FirewallAction::Accept) => Ok(FirewallAction::Accept),
        Ok(proto::FirewallAction::Drop) => Ok(FirewallAction::Drop),
        Err(_) => Err(Error::decode("firewall action", format!("unknown action {value}"))),
    }
}

pub fn firewall_rule(rule: &FirewallRule) -> proto::FirewallRule {
    proto::FirewallRule {
        rule_id: encode_id(&rule.meta.rule_id),
        direction: traffic_direction(rule.spec.direction) as i32,
        action: firewall_action(rule.spec.action) as i32,
        priority: rule.spec.priority,
        source_prefix: Some(prefix(&rule.spec.source_prefix)),
        destination_prefix: Some(prefix(&rule.spec.destination_prefix)),
        protocol_filter: rule.spec.protocol_filter.as_ref().map(protocol_filter),
    }
}

pub fn firewall_rule_from_proto(interface_id: &str, wire: &proto::FirewallRule) -> Result<FirewallRule> {
    let source = wire
        .source_prefix
        .as_ref()
        .ok_or_else(|| Error::decode("source prefix", "missing"))?;
    let destination = wire
        .destination_prefix
        .as_ref()
        .ok_or_else(|| Error::decode("destination prefix", "missing"))?;

    Ok(FirewallRule {
        meta: FirewallRuleMeta {
            interface_id: interface_id.to_string(),
            rule_id: decode_id("rule ID", &wire.rule_id)?,
        },
        spec: FirewallRuleSpec {
            direction: traffic_direction_from_proto(wire.direction)?,
            action: firewall_action_from_proto(wire.action)?,
            priority: wire.priority,
            source_prefix: decode_prefix("source prefix", source)?,
            destination_prefix: decode_prefix("destination prefix", destination)?,
            protocol_filter: protocol_filter_from_proto(wire.protocol_filter.as_ref())?,
        },
        status: Status::default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("10.20.30.40", proto::IpVersion::Ipv4 ; "ipv4")]
    #[test_case("ff80::5", proto::IpVersion::Ipv6 ; "ipv6")]
    #[test_case("::ffff:1.2.3.4", proto::IpVersion::Ipv6 ; "ipv4 mapped")]
    fn test_tag_follows_address_family(addr: &str, expected: proto::IpVersion) {
        let addr: IpAddr = addr.parse().unwrap();
        assert_eq!(ip_version(&addr), expected);

        let wire = lb_ip(&addr);
        assert_eq!(wire.ip_version, expected as i32);
        assert_eq!(wire.address, addr.to_string().into_bytes());
        assert_eq!(nat_ip(&addr).ip_version, expected as i32);
        assert_eq!(vip_ip(&addr).ip_version, expected as i32);
    }

    #[test_case("10.0.0.0/24" ; "ipv4 network")]
    #[test_case("10.0.0.5/24" ; "ipv4 host bits kept")]
    #[test_case("192.168.1.1/32" ; "ipv4 host")]
    #[test_case("2001:db8::/64" ; "ipv6 network")]
    #[test_case("::/0" ; "ipv6 default")]
    fn test_prefix_roundtrip(input: &str) {
        let net: IpNetwork = input.parse().unwrap();
        let wire = prefix(&net);
        assert!(!wire.address.contains(&b'/'));
        assert_eq!(decode_prefix("prefix", &wire).unwrap(), net);
    }

    #[test]
    fn test_decode_rejects_mismatched_tag() {
        let err = decode_addr("virtual IP", proto::IpVersion::Ipv6 as i32, b"10.0.0.1").unwrap_err();
        assert!(matches!(err, Error::Decode { field: "virtual IP", .. }));

        let err = decode_addr("virtual IP", 7, b"10.0.0.1").unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
    }

    #[test]
    fn test_decode_prefix_rejects_bad_length() {
        let wire = proto::Prefix {
            ip_version: proto::IpVersion::Ipv4 as i32,
            address: b"10.0.0.0".to_vec(),
            prefix_length: 33,
        };
        assert!(decode_prefix("prefix", &wire).is_err());
    }

    #[test]
    fn test_underlay_route() {
        assert_eq!(underlay_route(b"ff80::5").unwrap(), "ff80::5".parse::<IpAddr>().unwrap());
        assert!(matches!(underlay_route(b""), Err(Error::Decode { .. })));
        assert!(matches!(underlay_route(b"not-an-ip"), Err(Error::Decode { .. })));
        assert_eq!(optional_underlay_route(b"").unwrap(), None);
        assert!(optional_underlay_route(b"ff80::zz").is_err());
    }

    #[test]
    fn test_route_uses_fixed_weight_and_next_hop_family() {
        let wire = route(
            &"10.0.0.0/24".parse().unwrap(),
            200,
            &"ff80::1".parse().unwrap(),
        );
        assert_eq!(wire.weight, ROUTE_WEIGHT);
        assert_eq!(wire.ip_version, proto::IpVersion::Ipv6 as i32);
        let prefix = wire.prefix.as_ref().unwrap();
        assert_eq!(prefix.ip_version, proto::IpVersion::Ipv4 as i32);
        assert_eq!(prefix.address, b"10.0.0.0".to_vec());
        assert_eq!(prefix.prefix_length, 24);

        let decoded = route_from_proto(100, &wire).unwrap();
        assert_eq!(decoded.spec.next_hop.vni, 200);
        assert_eq!(decoded.meta.vni, 100);
    }

    #[test]
    fn test_create_interface_request_splits_families() {
        let iface = Interface::new(
            "vm-1",
            InterfaceSpec {
                vni: 100,
                device: "net_tap3".to_string(),
                ips: vec!["fd00::1".parse().unwrap(), "10.0.0.1".parse().unwrap()],
            },
        );
        let req = create_interface_request(&iface);
        assert_eq!(req.interface_id, b"vm-1".to_vec());
        let v4 = req.ipv4_config.unwrap();
        assert_eq!(v4.ip_version, proto::IpVersion::Ipv4 as i32);
        assert_eq!(v4.primary_address, b"10.0.0.1".to_vec());
        let v6 = req.ipv6_config.unwrap();
        assert_eq!(v6.ip_version, proto::IpVersion::Ipv6 as i32);
        assert_eq!(v6.primary_address, b"fd00::1".to_vec());
    }

    #[test]
    fn test_interface_from_proto_checks_field_family() {
        let mut wire = proto::Interface {
            interface_id: b"vm-1".to_vec(),
            vni: 100,
            primary_ipv4_address: b"10.0.0.1".to_vec(),
            primary_ipv6_address: Vec::new(),
            underlay_route: b"ff80::1".to_vec(),
            pci_dp_name: "net_tap3".to_string(),
        };
        let iface = interface_from_proto(&wire).unwrap();
        assert_eq!(iface.spec.ips, vec!["10.0.0.1".parse::<IpAddr>().unwrap()]);
        assert_eq!(iface.status.underlay_route, Some("ff80::1".parse().unwrap()));

        wire.primary_ipv4_address = b"fd00::1".to_vec();
        assert!(interface_from_proto(&wire).is_err());
    }

    #[test]
    fn test_lb_port_protocol_mapping() {
        let port: LbPort = "UDP/53".parse().unwrap();
        let wire = lb_port(&port);
        assert_eq!(wire.protocol, proto::Protocol::Udp as i32);
        assert_eq!(wire.port, 53);
        assert_eq!(lb_port_from_proto(&wire).unwrap(), port);

        let sctp: LbPort = "SCTP/9899".parse().unwrap();
        assert_eq!(lb_port(&sctp).protocol, proto::Protocol::Sctp as i32);

        let undefined = proto::LbPort {
            port: 80,
            protocol: proto::Protocol::Undefined as i32,
        };
        assert!(lb_port_from_proto(&undefined).is_err());
        let too_big = proto::LbPort {
            port: 65536,
            protocol: proto::Protocol::Tcp as i32,
        };
        assert!(lb_port_from_proto(&too_big).is_err());
    }

    fn port_filter_wire(src: (i32, i32), dst: (i32, i32)) -> proto::ProtocolFilter {
        proto::ProtocolFilter {
            filter: Some(proto::protocol_filter::Filter::Tcp(proto::PortFilter {
                src_port_lower: src.0,
                src_port_upper: src.1,
                dst_port_lower: dst.0,
                dst_port_upper: dst.1,
            })),
        }
    }

    #[test]
    fn test_port_filter_wildcards() {
        let filter = ProtocolFilter::Tcp(PortFilter {
            src_ports: None,
            dst_ports: Some(PortRange {
                lower: 80,
                upper: 90,
            }),
        });
        let wire = protocol_filter(&filter);
        assert_eq!(wire, port_filter_wire((-1, -1), (80, 90)));
        assert_eq!(protocol_filter_from_proto(Some(&wire)).unwrap(), Some(filter));
    }

    #[test_case((-1, 80) ; "half open range")]
    #[test_case((90, 80) ; "reversed range")]
    #[test_case((0, 70000) ; "port out of range")]
    fn test_port_filter_rejects(dst: (i32, i32)) {
        let wire = port_filter_wire((-1, -1), dst);
        assert!(matches!(
            protocol_filter_from_proto(Some(&wire)),
            Err(Error::Decode { field: "destination ports", .. })
        ));
    }

    #[test]
    fn test_icmp_filter_wildcards() {
        let filter = ProtocolFilter::Icmp(IcmpFilter {
            icmp_type: Some(8),
            icmp_code: None,
        });
        let wire = protocol_filter(&filter);
        assert_eq!(
            wire.filter,
            Some(proto::protocol_filter::Filter::Icmp(proto::IcmpFilter {
                icmp_type: 8,
                icmp_code: -1,
            }))
        );
        assert_eq!(protocol_filter_from_proto(Some(&wire)).unwrap(), Some(filter));
        assert_eq!(protocol_filter_from_proto(None).unwrap(), None);
        assert_eq!(
            protocol_filter_from_proto(Some(&proto::ProtocolFilter { filter: None })).unwrap(),
            None
        );
    }

    #[test]
    fn test_firewall_rule_roundtrip() {
        let rule = FirewallRule::new(
            "vm-1",
            "fw-1",
            FirewallRuleSpec {
                direction: TrafficDirection::Egress,
                action: FirewallAction::Drop,
                priority: 1000,
                source_prefix: "10.0.0.0/8".parse().unwrap(),
                destination_prefix: "::/0".parse().unwrap(),
                protocol_filter: None,
            },
        );
        let wire = firewall_rule(&rule);
        assert_eq!(wire.rule_id, b"fw-1".to_vec());
        assert_eq!(wire.direction, proto::TrafficDirection::Egress as i32);
        assert_eq!(wire.action, proto::FirewallAction::Drop as i32);
        assert_eq!(
            wire.destination_prefix.as_ref().unwrap().ip_version,
            proto::IpVersion::Ipv6 as i32
        );
        assert_eq!(firewall_rule_from_proto("vm-1", &wire).unwrap(), rule);

        let mut bad = wire.clone();
        bad.action = 9;
        assert!(firewall_rule_from_proto("vm-1", &bad).is_err());
        let mut bad = wire;
        bad.source_prefix = None;
        assert!(matches!(
            firewall_rule_from_proto("vm-1", &bad),
            Err(Error::Decode { field: "source prefix", .. })
        ));
    }

    #[test]
    fn test_init_requires_uuid() {
        assert_eq!(init_from_uuid("abc-123").unwrap().spec.uuid, "abc-123");
        assert!(matches!(init_from_uuid(""), Err(Error::Decode { .. })));
    }
}
