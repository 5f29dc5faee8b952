//! Typed dpservice client
//!
//! Each operation is exactly one round trip: the request is assembled from
//! the resource types, the response status is checked, and the payload is
//! decoded back into resource types. Transport errors are returned as-is;
//! nothing is retried or cached.

use dpservice_common::{
    Error, FirewallRule, Init, Interface, List, LoadBalancer, LoadBalancerTarget, Nat, NatEntry,
    NatInfoKind, Object, Prefix, Result, Route, Status, Version, VirtualIp, Vni, VniKind,
};
use ipnetwork::IpNetwork;
use std::net::IpAddr;
use tracing::{debug, warn};

use crate::convert;
use crate::grpc::DpdkService;
use crate::proto;

/// Wire responses that embed a status sub-structure.
pub trait WireStatus {
    fn wire_status(&self) -> Option<&proto::Status>;
}

impl WireStatus for proto::Status {
    fn wire_status(&self) -> Option<&proto::Status> {
        Some(self)
    }
}

impl WireStatus for proto::CreateInterfaceResponse {
    fn wire_status(&self) -> Option<&proto::Status> {
        self.response.as_ref().and_then(|r| r.status.as_ref())
    }
}

macro_rules! impl_wire_status {
    ($($response:ty),* $(,)?) => {
        $(
            impl WireStatus for $response {
                fn wire_status(&self) -> Option<&proto::Status> {
                    self.status.as_ref()
                }
            }
        )*
    };
}

impl_wire_status!(
    proto::GetVersionResponse,
    proto::CheckInitializedResponse,
    proto::InitializeResponse,
    proto::GetInterfaceResponse,
    proto::InterfacesMsg,
    proto::IpAdditionResponse,
    proto::GetVipResponse,
    proto::PrefixesMsg,
    proto::CreateInterfaceLoadBalancerPrefixResponse,
    proto::ListInterfaceLoadBalancerPrefixesResponse,
    proto::RoutesMsg,
    proto::CreateLoadBalancerResponse,
    proto::GetLoadBalancerResponse,
    proto::GetLoadBalancerTargetsResponse,
    proto::AddNatResponse,
    proto::GetNatResponse,
    proto::GetNatInfoResponse,
    proto::IsVniInUseResponse,
    proto::AddFirewallRuleResponse,
    proto::GetFirewallRuleResponse,
    proto::ListFirewallRulesResponse,
);

/// Turn a raw call result into a checked response.
///
/// A non-zero status code wins over everything else in the response.
fn checked<R: WireStatus>(operation: &'static str, result: std::result::Result<R, tonic::Status>) -> Result<R> {
    let response = result?;
    if let Some(status) = response.wire_status() {
        if status.error != 0 {
            warn!(operation, code = status.error, "{}", status.message);
            return Err(Error::status(status.error, status.message.clone()));
        }
    }
    Ok(response)
}

/// Decode every element or fail the whole list.
fn decode_list<W, T, F>(items: &[W], decode: F) -> Result<List<T>>
where
    T: Object,
    F: FnMut(&W) -> Result<T>,
{
    items
        .iter()
        .map(decode)
        .collect::<Result<Vec<_>>>()
        .map(List::new)
}

/// Status of a successful response, message included.
fn reported<R: WireStatus>(response: &R) -> Status {
    Status {
        message: response
            .wire_status()
            .map(|s| s.message.clone())
            .unwrap_or_default(),
        ..Default::default()
    }
}

/// Status of a successful create that must have assigned an underlay route.
fn assigned<R: WireStatus>(response: &R, underlay_route: &[u8]) -> Result<Status> {
    Ok(Status {
        message: reported(response).message,
        ..Status::with_underlay_route(convert::underlay_route(underlay_route)?)
    })
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::InvalidRequest(format!("{field} must be set")));
    }
    Ok(())
}

/// Client for the dpservice dataplane daemon
pub struct Client<S> {
    service: S,
}

impl<S: DpdkService> Client<S> {
    /// Create a client over a connected service
    pub fn new(service: S) -> Self {
        Self { service }
    }

    /// Take back the underlying service
    pub fn into_inner(self) -> S {
        self.service
    }

    // Service operations

    /// Exchange client and service versions
    pub async fn get_version(&mut self, client_name: &str, client_version: &str) -> Result<Version> {
        debug!(client_name, client_version, "GetVersion");
        let request = convert::get_version_request(client_name, client_version);
        let res = checked(
            "GetVersion",
            self.service.get_version(request.clone()).await,
        )?;

        Ok(Version {
            spec: convert::version_spec(&request, &res),
            status: reported(&res),
        })
    }

    /// Get the UUID of the running service, failing if it is not initialized
    pub async fn get_init(&mut self) -> Result<Init> {
        debug!("CheckInitialized");
        let res = checked(
            "CheckInitialized",
            self.service
                .check_initialized(proto::CheckInitializedRequest {})
                .await,
        )?;
        let mut init = convert::init_from_uuid(&res.uuid)?;
        init.status = reported(&res);
        Ok(init)
    }

    /// Initialize the service
    pub async fn initialize(&mut self) -> Result<Init> {
        debug!("Initialize");
        let res = checked(
            "Initialize",
            self.service.initialize(proto::InitializeRequest {}).await,
        )?;
        let mut init = convert::init_from_uuid(&res.uuid)?;
        init.status = reported(&res);
        Ok(init)
    }

    // Interface operations

    /// Get an interface by ID
    pub async fn get_interface(&mut self, id: &str) -> Result<Interface> {
        debug!(id, "GetInterface");
        let res = checked(
            "GetInterface",
            self.service.get_interface(convert::interface_id_msg(id)).await,
        )?;
        let iface = res
            .interface
            .as_ref()
            .ok_or_else(|| Error::decode("interface", "missing from response"))?;
        convert::interface_from_proto(iface)
    }

    /// List all interfaces
    pub async fn list_interfaces(&mut self) -> Result<List<Interface>> {
        debug!("ListInterfaces");
        let res = checked(
            "ListInterfaces",
            self.service.list_interfaces(proto::Empty {}).await,
        )?;
        decode_list(&res.interfaces, convert::interface_from_proto)
    }

    /// Create a virtual interface
    pub async fn create_interface(&mut self, iface: &Interface) -> Result<Interface> {
        require("interface ID", &iface.meta.id)?;
        debug!(id = %iface.meta.id, vni = iface.spec.vni, "CreateInterface");
        let res = checked(
            "CreateInterface",
            self.service
                .create_interface(convert::create_interface_request(iface))
                .await,
        )?;
        let underlay = res
            .response
            .as_ref()
            .map(|r| r.underlay_route.as_slice())
            .unwrap_or_default();

        Ok(Interface {
            meta: iface.meta.clone(),
            spec: iface.spec.clone(),
            status: assigned(&res, underlay)?,
        })
    }

    /// Delete an interface
    pub async fn delete_interface(&mut self, id: &str) -> Result<()> {
        debug!(id, "DeleteInterface");
        checked(
            "DeleteInterface",
            self.service.delete_interface(convert::interface_id_msg(id)).await,
        )?;
        Ok(())
    }

    // Virtual IP operations

    /// Get the virtual IP of an interface
    pub async fn get_virtual_ip(&mut self, interface_id: &str) -> Result<VirtualIp> {
        debug!(interface_id, "GetVirtualIP");
        let res = checked(
            "GetVirtualIP",
            self.service
                .get_interface_vip(convert::interface_id_msg(interface_id))
                .await,
        )?;
        convert::virtual_ip_from_proto(interface_id, &res)
    }

    /// Add a virtual IP to an interface
    pub async fn create_virtual_ip(&mut self, vip: &VirtualIp) -> Result<VirtualIp> {
        require("interface ID", &vip.meta.interface_id)?;
        debug!(interface_id = %vip.meta.interface_id, ip = %vip.spec.ip, "CreateVirtualIP");
        let res = checked(
            "CreateVirtualIP",
            self.service
                .add_interface_vip(proto::InterfaceVipMsg {
                    interface_id: convert::encode_id(&vip.meta.interface_id),
                    interface_vip_ip: Some(convert::vip_ip(&vip.spec.ip)),
                })
                .await,
        )?;

        Ok(VirtualIp {
            meta: vip.meta.clone(),
            spec: vip.spec.clone(),
            status: assigned(&res, &res.underlay_route)?,
        })
    }

    /// Remove the virtual IP of an interface
    pub async fn delete_virtual_ip(&mut self, interface_id: &str) -> Result<()> {
        debug!(interface_id, "DeleteVirtualIP");
        checked(
            "DeleteVirtualIP",
            self.service
                .delete_interface_vip(convert::interface_id_msg(interface_id))
                .await,
        )?;
        Ok(())
    }

    // Prefix operations

    /// List prefixes routed to an interface
    pub async fn list_prefixes(&mut self, interface_id: &str) -> Result<List<Prefix>> {
        debug!(interface_id, "ListPrefixes");
        let res = checked(
            "ListPrefixes",
            self.service
                .list_interface_prefixes(convert::interface_id_msg(interface_id))
                .await,
        )?;
        decode_list(&res.prefixes, |p| convert::prefix_from_proto(interface_id, p))
    }

    /// Route a prefix to an interface
    pub async fn create_prefix(&mut self, prefix: &Prefix) -> Result<Prefix> {
        require("interface ID", &prefix.meta.interface_id)?;
        debug!(interface_id = %prefix.meta.interface_id, prefix = %prefix.spec.prefix, "CreatePrefix");
        let res = checked(
            "CreatePrefix",
            self.service
                .add_interface_prefix(proto::InterfacePrefixMsg {
                    interface_id: Some(convert::interface_id_msg(&prefix.meta.interface_id)),
                    prefix: Some(convert::prefix(&prefix.spec.prefix)),
                })
                .await,
        )?;

        Ok(Prefix {
            meta: prefix.meta.clone(),
            spec: prefix.spec.clone(),
            status: assigned(&res, &res.underlay_route)?,
        })
    }

    /// Remove a prefix from an interface
    pub async fn delete_prefix(&mut self, interface_id: &str, prefix: IpNetwork) -> Result<()> {
        debug!(interface_id, %prefix, "DeletePrefix");
        checked(
            "DeletePrefix",
            self.service
                .delete_interface_prefix(proto::InterfacePrefixMsg {
                    interface_id: Some(convert::interface_id_msg(interface_id)),
                    prefix: Some(convert::prefix(&prefix)),
                })
                .await,
        )?;
        Ok(())
    }

    // Load balancer prefix operations

    /// List load balancer prefixes of an interface
    pub async fn list_load_balancer_prefixes(&mut self, interface_id: &str) -> Result<List<Prefix>> {
        debug!(interface_id, "ListLoadBalancerPrefixes");
        let res = checked(
            "ListLoadBalancerPrefixes",
            self.service
                .list_interface_load_balancer_prefixes(proto::ListInterfaceLoadBalancerPrefixesRequest {
                    interface_id: convert::encode_id(interface_id),
                })
                .await,
        )?;
        decode_list(&res.prefixes, |p| convert::lb_prefix_from_proto(interface_id, p))
    }

    /// Add a load balancer prefix to an interface
    pub async fn create_load_balancer_prefix(&mut self, prefix: &Prefix) -> Result<Prefix> {
        require("interface ID", &prefix.meta.interface_id)?;
        debug!(
            interface_id = %prefix.meta.interface_id,
            prefix = %prefix.spec.prefix,
            "CreateLoadBalancerPrefix"
        );
        let res = checked(
            "CreateLoadBalancerPrefix",
            self.service
                .create_interface_load_balancer_prefix(proto::CreateInterfaceLoadBalancerPrefixRequest {
                    interface_id: Some(convert::interface_id_msg(&prefix.meta.interface_id)),
                    prefix: Some(convert::prefix(&prefix.spec.prefix)),
                })
                .await,
        )?;

        Ok(Prefix {
            meta: prefix.meta.clone(),
            spec: prefix.spec.clone(),
            status: assigned(&res, &res.underlay_route)?,
        })
    }

    /// Remove a load balancer prefix from an interface
    pub async fn delete_load_balancer_prefix(&mut self, interface_id: &str, prefix: IpNetwork) -> Result<()> {
        debug!(interface_id, %prefix, "DeleteLoadBalancerPrefix");
        checked(
            "DeleteLoadBalancerPrefix",
            self.service
                .delete_interface_load_balancer_prefix(proto::DeleteInterfaceLoadBalancerPrefixRequest {
                    interface_id: Some(convert::interface_id_msg(interface_id)),
                    prefix: Some(convert::prefix(&prefix)),
                })
                .await,
        )?;
        Ok(())
    }

    // Route operations

    /// List routes of a VNI
    pub async fn list_routes(&mut self, vni: u32) -> Result<List<Route>> {
        debug!(vni, "ListRoutes");
        let res = checked(
            "ListRoutes",
            self.service.list_routes(proto::VniMsg { vni }).await,
        )?;
        decode_list(&res.routes, |r| convert::route_from_proto(vni, r))
    }

    /// Add a route to a VNI
    pub async fn create_route(&mut self, route: &Route) -> Result<Route> {
        let next_hop = &route.spec.next_hop;
        debug!(vni = route.meta.vni, prefix = %route.spec.prefix, "CreateRoute");
        let res = checked(
            "CreateRoute",
            self.service
                .add_route(convert::vni_route_msg(
                    route.meta.vni,
                    &route.spec.prefix,
                    next_hop.vni,
                    &next_hop.ip,
                ))
                .await,
        )?;

        Ok(Route {
            meta: route.meta.clone(),
            spec: route.spec.clone(),
            status: reported(&res),
        })
    }

    /// Routes are keyed by the full tuple, not by an ID.
    pub async fn delete_route(
        &mut self,
        vni: u32,
        prefix: IpNetwork,
        next_hop_vni: u32,
        next_hop_ip: IpAddr,
    ) -> Result<()> {
        debug!(vni, %prefix, next_hop_vni, %next_hop_ip, "DeleteRoute");
        checked(
            "DeleteRoute",
            self.service
                .delete_route(convert::vni_route_msg(vni, &prefix, next_hop_vni, &next_hop_ip))
                .await,
        )?;
        Ok(())
    }

    // VNI operations

    /// Report whether a VNI is in use for the given address family
    pub async fn get_vni(&mut self, vni: u32, kind: VniKind) -> Result<Vni> {
        debug!(vni, %kind, "CheckVniInUse");
        let res = checked(
            "CheckVniInUse",
            self.service
                .check_vni_in_use(proto::IsVniInUseRequest {
                    vni,
                    vni_type: convert::vni_type(kind) as i32,
                })
                .await,
        )?;
        let mut result = convert::vni_from_proto(vni, kind, &res);
        result.status = reported(&res);
        Ok(result)
    }

    /// Drop every route and entry of a VNI
    pub async fn reset_vni(&mut self, vni: u32, kind: VniKind) -> Result<()> {
        debug!(vni, %kind, "ResetVni");
        checked(
            "ResetVni",
            self.service
                .reset_vni(proto::ResetVniRequest {
                    vni,
                    vni_type: convert::vni_type(kind) as i32,
                })
                .await,
        )?;
        Ok(())
    }

    // Load balancer operations

    /// Get a load balancer by ID
    pub async fn get_load_balancer(&mut self, id: &str) -> Result<LoadBalancer> {
        debug!(id, "GetLoadBalancer");
        let res = checked(
            "GetLoadBalancer",
            self.service
                .get_load_balancer(proto::GetLoadBalancerRequest {
                    load_balancer_id: convert::encode_id(id),
                })
                .await,
        )?;
        convert::load_balancer_from_proto(id, &res)
    }

    /// Create a load balancer
    pub async fn create_load_balancer(&mut self, lb: &LoadBalancer) -> Result<LoadBalancer> {
        require("load balancer ID", &lb.meta.id)?;
        debug!(id = %lb.meta.id, vni = lb.spec.vni, vip = %lb.spec.vip, "CreateLoadBalancer");
        let res = checked(
            "CreateLoadBalancer",
            self.service
                .create_load_balancer(convert::create_load_balancer_request(lb))
                .await,
        )?;

        Ok(LoadBalancer {
            meta: lb.meta.clone(),
            spec: lb.spec.clone(),
            status: assigned(&res, &res.underlay_route)?,
        })
    }

    /// Delete a load balancer
    pub async fn delete_load_balancer(&mut self, id: &str) -> Result<()> {
        debug!(id, "DeleteLoadBalancer");
        checked(
            "DeleteLoadBalancer",
            self.service
                .delete_load_balancer(proto::DeleteLoadBalancerRequest {
                    load_balancer_id: convert::encode_id(id),
                })
                .await,
        )?;
        Ok(())
    }

    // Load balancer target operations

    /// List targets of a load balancer
    pub async fn list_load_balancer_targets(&mut self, lb_id: &str) -> Result<List<LoadBalancerTarget>> {
        debug!(lb_id, "ListLoadBalancerTargets");
        let res = checked(
            "ListLoadBalancerTargets",
            self.service
                .get_load_balancer_targets(proto::GetLoadBalancerTargetsRequest {
                    load_balancer_id: convert::encode_id(lb_id),
                })
                .await,
        )?;
        decode_list(&res.target_ips, |t| convert::load_balancer_target_from_proto(lb_id, t))
    }

    /// Add a target to a load balancer
    pub async fn create_load_balancer_target(
        &mut self,
        target: &LoadBalancerTarget,
    ) -> Result<LoadBalancerTarget> {
        require("load balancer ID", &target.meta.load_balancer_id)?;
        debug!(
            lb_id = %target.meta.load_balancer_id,
            target_ip = %target.spec.target_ip,
            "CreateLoadBalancerTarget"
        );
        let res = checked(
            "CreateLoadBalancerTarget",
            self.service
                .add_load_balancer_target(proto::AddLoadBalancerTargetRequest {
                    load_balancer_id: convert::encode_id(&target.meta.load_balancer_id),
                    target_ip: Some(convert::lb_ip(&target.spec.target_ip)),
                })
                .await,
        )?;

        Ok(LoadBalancerTarget {
            meta: target.meta.clone(),
            spec: target.spec.clone(),
            status: reported(&res),
        })
    }

    /// Remove a target from a load balancer
    pub async fn delete_load_balancer_target(&mut self, lb_id: &str, target_ip: IpAddr) -> Result<()> {
        debug!(lb_id, %target_ip, "DeleteLoadBalancerTarget");
        checked(
            "DeleteLoadBalancerTarget",
            self.service
                .delete_load_balancer_target(proto::DeleteLoadBalancerTargetRequest {
                    load_balancer_id: convert::encode_id(lb_id),
                    target_ip: Some(convert::lb_ip(&target_ip)),
                })
                .await,
        )?;
        Ok(())
    }

    // NAT operations

    /// Get the NAT of an interface
    pub async fn get_nat(&mut self, interface_id: &str) -> Result<Nat> {
        debug!(interface_id, "GetNat");
        let res = checked(
            "GetNat",
            self.service
                .get_nat(proto::GetNatRequest {
                    interface_id: convert::encode_id(interface_id),
                })
                .await,
        )?;
        convert::nat_from_proto(interface_id, &res)
    }

    /// Put an interface behind a NAT IP and port range
    pub async fn create_nat(&mut self, nat: &Nat) -> Result<Nat> {
        require("interface ID", &nat.meta.interface_id)?;
        debug!(
            interface_id = %nat.meta.interface_id,
            nat_ip = %nat.spec.nat_ip,
            min_port = nat.spec.min_port,
            max_port = nat.spec.max_port,
            "CreateNat"
        );
        let res = checked(
            "CreateNat",
            self.service.add_nat(convert::add_nat_request(nat)).await,
        )?;

        Ok(Nat {
            meta: nat.meta.clone(),
            spec: nat.spec.clone(),
            status: assigned(&res, &res.underlay_route)?,
        })
    }

    /// Remove the NAT of an interface
    pub async fn delete_nat(&mut self, interface_id: &str) -> Result<()> {
        debug!(interface_id, "DeleteNat");
        checked(
            "DeleteNat",
            self.service
                .delete_nat(proto::DeleteNatRequest {
                    interface_id: convert::encode_id(interface_id),
                })
                .await,
        )?;
        Ok(())
    }

    /// NAT translations the service holds for `nat_ip`.
    pub async fn list_nats(&mut self, nat_ip: IpAddr, kind: NatInfoKind) -> Result<List<NatEntry>> {
        debug!(%nat_ip, %kind, "ListNats");
        let res = checked(
            "ListNats",
            self.service
                .get_nat_info(proto::GetNatInfoRequest {
                    nat_vip_ip: Some(convert::nat_ip(&nat_ip)),
                    nat_info_type: convert::nat_info_type(kind) as i32,
                })
                .await,
        )?;
        decode_list(&res.nat_info_entries, |e| convert::nat_entry_from_proto(nat_ip, e))
    }

    // Firewall rule operations

    /// Get a firewall rule of an interface
    pub async fn get_firewall_rule(&mut self, interface_id: &str, rule_id: &str) -> Result<FirewallRule> {
        debug!(interface_id, rule_id, "GetFirewallRule");
        let res = checked(
            "GetFirewallRule",
            self.service
                .get_firewall_rule(proto::GetFirewallRuleRequest {
                    interface_id: convert::encode_id(interface_id),
                    rule_id: convert::encode_id(rule_id),
                })
                .await,
        )?;
        let rule = res
            .rule
            .as_ref()
            .ok_or_else(|| Error::decode("firewall rule", "missing from response"))?;
        convert::firewall_rule_from_proto(interface_id, rule)
    }

    /// List firewall rules of an interface
    pub async fn list_firewall_rules(&mut self, interface_id: &str) -> Result<List<FirewallRule>> {
        debug!(interface_id, "ListFirewallRules");
        let res = checked(
            "ListFirewallRules",
            self.service
                .list_firewall_rules(convert::interface_id_msg(interface_id))
                .await,
        )?;
        decode_list(&res.rules, |r| convert::firewall_rule_from_proto(interface_id, r))
    }

    /// Install a firewall rule on an interface
    pub async fn create_firewall_rule(&mut self, rule: &FirewallRule) -> Result<FirewallRule> {
        require("interface ID", &rule.meta.interface_id)?;
        require("rule ID", &rule.meta.rule_id)?;
        debug!(
            interface_id = %rule.meta.interface_id,
            rule_id = %rule.meta.rule_id,
            priority = rule.spec.priority,
            "CreateFirewallRule"
        );
        let res = checked(
            "CreateFirewallRule",
            self.service
                .add_firewall_rule(proto::AddFirewallRuleRequest {
                    interface_id: convert::encode_id(&rule.meta.interface_id),
                    rule: Some(convert::firewall_rule(rule)),
                })
                .await,
        )?;

        let mut created = rule.clone();
        if !res.rule_id.is_empty() {
            created.meta.rule_id = convert::decode_id("rule ID", &res.rule_id)?;
        }
        created.status = reported(&res);
        Ok(created)
    }

    /// Remove a firewall rule from an interface
    pub async fn delete_firewall_rule(&mut self, interface_id: &str, rule_id: &str) -> Result<()> {
        debug!(interface_id, rule_id, "DeleteFirewallRule");
        checked(
            "DeleteFirewallRule",
            self.service
                .delete_firewall_rule(proto::DeleteFirewallRuleRequest {
                    interface_id: convert::encode_id(interface_id),
                    rule_id: convert::encode_id(rule_id),
                })
                .await,
        )?;
        Ok(())
    }
}
