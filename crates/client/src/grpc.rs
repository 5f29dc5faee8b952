//! Remote procedure interface of dpservice
//!
//! [`DpdkService`] is the seam between the typed [`Client`](crate::Client)
//! and the wire. The generated tonic client implements it over a channel;
//! tests substitute an in-memory fake.

use async_trait::async_trait;
use tonic::transport::Channel;

use crate::proto::dpd_konmetal_client::DpdKonmetalClient;
use crate::proto::*;

/// Generated `DPDKonmetal` client over a tonic channel.
pub type DpdkGrpcClient = DpdKonmetalClient<Channel>;

/// One method per unary RPC of `dpdkonmetal.DPDKonmetal`.
#[async_trait]
pub trait DpdkService: Send {
    async fn get_version(
        &mut self,
        request: GetVersionRequest,
    ) -> Result<GetVersionResponse, tonic::Status>;
    async fn check_initialized(
        &mut self,
        request: CheckInitializedRequest,
    ) -> Result<CheckInitializedResponse, tonic::Status>;
    async fn initialize(
        &mut self,
        request: InitializeRequest,
    ) -> Result<InitializeResponse, tonic::Status>;

    async fn create_interface(
        &mut self,
        request: CreateInterfaceRequest,
    ) -> Result<CreateInterfaceResponse, tonic::Status>;
    async fn get_interface(
        &mut self,
        request: InterfaceIdMsg,
    ) -> Result<GetInterfaceResponse, tonic::Status>;
    async fn list_interfaces(&mut self, request: Empty) -> Result<InterfacesMsg, tonic::Status>;
    async fn delete_interface(&mut self, request: InterfaceIdMsg) -> Result<Status, tonic::Status>;

    async fn add_interface_vip(
        &mut self,
        request: InterfaceVipMsg,
    ) -> Result<IpAdditionResponse, tonic::Status>;
    async fn get_interface_vip(
        &mut self,
        request: InterfaceIdMsg,
    ) -> Result<GetVipResponse, tonic::Status>;
    async fn delete_interface_vip(
        &mut self,
        request: InterfaceIdMsg,
    ) -> Result<Status, tonic::Status>;

    async fn add_interface_prefix(
        &mut self,
        request: InterfacePrefixMsg,
    ) -> Result<IpAdditionResponse, tonic::Status>;
    async fn list_interface_prefixes(
        &mut self,
        request: InterfaceIdMsg,
    ) -> Result<PrefixesMsg, tonic::Status>;
    async fn delete_interface_prefix(
        &mut self,
        request: InterfacePrefixMsg,
    ) -> Result<Status, tonic::Status>;

    async fn create_interface_load_balancer_prefix(
        &mut self,
        request: CreateInterfaceLoadBalancerPrefixRequest,
    ) -> Result<CreateInterfaceLoadBalancerPrefixResponse, tonic::Status>;
    async fn list_interface_load_balancer_prefixes(
        &mut self,
        request: ListInterfaceLoadBalancerPrefixesRequest,
    ) -> Result<ListInterfaceLoadBalancerPrefixesResponse, tonic::Status>;
    async fn delete_interface_load_balancer_prefix(
        &mut self,
        request: DeleteInterfaceLoadBalancerPrefixRequest,
    ) -> Result<Status, tonic::Status>;

    async fn add_route(&mut self, request: VniRouteMsg) -> Result<Status, tonic::Status>;
    async fn list_routes(&mut self, request: VniMsg) -> Result<RoutesMsg, tonic::Status>;
    async fn delete_route(&mut self, request: VniRouteMsg) -> Result<Status, tonic::Status>;

    async fn check_vni_in_use(
        &mut self,
        request: IsVniInUseRequest,
    ) -> Result<IsVniInUseResponse, tonic::Status>;
    async fn reset_vni(&mut self, request: ResetVniRequest) -> Result<Status, tonic::Status>;

    async fn create_load_balancer(
        &mut self,
        request: CreateLoadBalancerRequest,
    ) -> Result<CreateLoadBalancerResponse, tonic::Status>;
    async fn get_load_balancer(
        &mut self,
        request: GetLoadBalancerRequest,
    ) -> Result<GetLoadBalancerResponse, tonic::Status>;
    async fn delete_load_balancer(
        &mut self,
        request: DeleteLoadBalancerRequest,
    ) -> Result<Status, tonic::Status>;

    async fn add_load_balancer_target(
        &mut self,
        request: AddLoadBalancerTargetRequest,
    ) -> Result<Status, tonic::Status>;
    async fn get_load_balancer_targets(
        &mut self,
        request: GetLoadBalancerTargetsRequest,
    ) -> Result<GetLoadBalancerTargetsResponse, tonic::Status>;
    async fn delete_load_balancer_target(
        &mut self,
        request: DeleteLoadBalancerTargetRequest,
    ) -> Result<Status, tonic::Status>;

    async fn add_nat(&mut self, request: AddNatRequest) -> Result<AddNatResponse, tonic::Status>;
    async fn get_nat(&mut self, request: GetNatRequest) -> Result<GetNatResponse, tonic::Status>;
    async fn delete_nat(&mut self, request: DeleteNatRequest) -> Result<Status, tonic::Status>;
    async fn get_nat_info(
        &mut self,
        request: GetNatInfoRequest,
    ) -> Result<GetNatInfoResponse, tonic::Status>;

    async fn add_firewall_rule(
        &mut self,
        request: AddFirewallRuleRequest,
    ) -> Result<AddFirewallRuleResponse, tonic::Status>;
    async fn get_firewall_rule(
        &mut self,
        request: GetFirewallRuleRequest,
    ) -> Result<GetFirewallRuleResponse, tonic::Status>;
    async fn delete_firewall_rule(
        &mut self,
        request: DeleteFirewallRuleRequest,
    ) -> Result<Status, tonic::Status>;
    async fn list_firewall_rules(
        &mut self,
        request: InterfaceIdMsg,
    ) -> Result<ListFirewallRulesResponse, tonic::Status>;
}

/// Forward trait methods to the generated client, unwrapping the response.
macro_rules! forward {
    ($($method:ident($request:ty) -> $response:ty;)*) => {
        #[async_trait]
        impl DpdkService for DpdkGrpcClient {
            $(
                async fn $method(&mut self, request: $request) -> Result<$response, tonic::Status> {
                    DpdKonmetalClient::$method(self, request)
                        .await
                        .map(tonic::Response::into_inner)
                }
            )*
        }
    };
}

forward! {
    get_version(GetVersionRequest) -> GetVersionResponse;
    check_initialized(CheckInitializedRequest) -> CheckInitializedResponse;
    initialize(InitializeRequest) -> InitializeResponse;

    create_interface(CreateInterfaceRequest) -> CreateInterfaceResponse;
    get_interface(InterfaceIdMsg) -> GetInterfaceResponse;
    list_interfaces(Empty) -> InterfacesMsg;
    delete_interface(InterfaceIdMsg) -> Status;

    add_interface_vip(InterfaceVipMsg) -> IpAdditionResponse;
    get_interface_vip(InterfaceIdMsg) -> GetVipResponse;
    delete_interface_vip(InterfaceIdMsg) -> Status;

    add_interface_prefix(InterfacePrefixMsg) -> IpAdditionResponse;
    list_interface_prefixes(InterfaceIdMsg) -> PrefixesMsg;
    delete_interface_prefix(InterfacePrefixMsg) -> Status;

    create_interface_load_balancer_prefix(CreateInterfaceLoadBalancerPrefixRequest)
        -> CreateInterfaceLoadBalancerPrefixResponse;
    list_interface_load_balancer_prefixes(ListInterfaceLoadBalancerPrefixesRequest)
        -> ListInterfaceLoadBalancerPrefixesResponse;
    delete_interface_load_balancer_prefix(DeleteInterfaceLoadBalancerPrefixRequest) -> Status;

    add_route(VniRouteMsg) -> Status;
    list_routes(VniMsg) -> RoutesMsg;
    delete_route(VniRouteMsg) -> Status;

    check_vni_in_use(IsVniInUseRequest) -> IsVniInUseResponse;
    reset_vni(ResetVniRequest) -> Status;

    create_load_balancer(CreateLoadBalancerRequest) -> CreateLoadBalancerResponse;
    get_load_balancer(GetLoadBalancerRequest) -> GetLoadBalancerResponse;
    delete_load_balancer(DeleteLoadBalancerRequest) -> Status;

    add_load_balancer_target(AddLoadBalancerTargetRequest) -> Status;
    get_load_balancer_targets(GetLoadBalancerTargetsRequest) -> GetLoadBalancerTargetsResponse;
    delete_load_balancer_target(DeleteLoadBalancerTargetRequest) -> Status;

    add_nat(AddNatRequest) -> AddNatResponse;
    get_nat(GetNatRequest) -> GetNatResponse;
    delete_nat(DeleteNatRequest) -> Status;
    get_nat_info(GetNatInfoRequest) -> GetNatInfoResponse;

    add_firewall_rule(AddFirewallRuleRequest) -> AddFirewallRuleResponse;
    get_firewall_rule(GetFirewallRuleRequest) -> GetFirewallRuleResponse;
    delete_firewall_rule(DeleteFirewallRuleRequest) -> Status;
    list_firewall_rules(InterfaceIdMsg) -> ListFirewallRulesResponse;
}
