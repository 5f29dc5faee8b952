//! Output rendering for CLI
//!
//! A result is turned into a [`View`] once, then any registered
//! [`Renderer`] can write it out.

use anyhow::{anyhow, bail, Result};
use comfy_table::{presets::NOTHING, ContentArrangement, Table};
use dpservice_common::{
    FirewallRule, Init, Interface, List, LoadBalancer, LoadBalancerTarget, Nat, NatEntry, Object,
    Prefix, Route, Version, VirtualIp, Vni,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::io::Write;
use std::net::IpAddr;

/// Trait for items that can be displayed in a table
pub trait TableDisplay {
    fn headers() -> Vec<&'static str>;
    fn row(&self) -> Vec<String>;
}

/// Render-ready form of one object or one list.
#[derive(Debug, Clone)]
pub struct View {
    /// Kind of the contained objects, e.g. `Interface`.
    pub kind: &'static str,
    /// Serialized form, tagged with its kind.
    pub value: Value,
    pub names: Vec<String>,
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
    pub is_list: bool,
}

impl View {
    pub fn object<T: Object + TableDisplay>(obj: &T) -> Result<Self> {
        Ok(Self {
            kind: T::KIND,
            value: tagged(T::KIND, obj)?,
            names: vec![obj.name()],
            headers: T::headers(),
            rows: vec![obj.row()],
            is_list: false,
        })
    }

    pub fn list<T: Object + TableDisplay>(list: &List<T>) -> Result<Self> {
        let items = list
            .items
            .iter()
            .map(|item| tagged(T::KIND, item))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            kind: T::KIND,
            value: json!({ "kind": List::<T>::kind(), "items": items }),
            names: list.items.iter().map(Object::name).collect(),
            headers: T::headers(),
            rows: list.items.iter().map(TableDisplay::row).collect(),
            is_list: true,
        })
    }

    /// Identity of a resource that no longer exists.
    pub fn identity(kind: &'static str, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            kind,
            value: json!({ "kind": kind, "name": name }),
            names: vec![name.clone()],
            headers: vec!["Kind", "Name"],
            rows: vec![vec![kind.to_string(), name]],
            is_list: false,
        }
    }
}

fn tagged<T: Serialize>(kind: &str, obj: &T) -> Result<Value> {
    let mut value = serde_json::to_value(obj)?;
    match value.as_object_mut() {
        Some(map) => {
            map.insert("kind".to_string(), Value::String(kind.to_string()));
            Ok(value)
        }
        None => Err(anyhow!("{kind} did not serialize to an object")),
    }
}

/// Writes a [`View`] in one output format.
pub trait Renderer {
    fn render(&self, view: &View, out: &mut dyn Write) -> Result<()>;
}

/// Options shared by every renderer constructor.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub pretty: bool,
    /// Word appended by the name renderer, e.g. `created`.
    pub operation: Option<String>,
}

pub struct JsonRenderer {
    pretty: bool,
}

impl Renderer for JsonRenderer {
    fn render(&self, view: &View, out: &mut dyn Write) -> Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut *out, &view.value)?;
        } else {
            serde_json::to_writer(&mut *out, &view.value)?;
        }
        writeln!(out)?;
        Ok(())
    }
}

pub struct YamlRenderer;

impl Renderer for YamlRenderer {
    fn render(&self, view: &View, out: &mut dyn Write) -> Result<()> {
        serde_yaml::to_writer(&mut *out, &view.value)?;
        Ok(())
    }
}

/// One `<kind>/<name> [operation]` line per object.
pub struct NameRenderer {
    operation: Option<String>,
}

impl Renderer for NameRenderer {
    fn render(&self, view: &View, out: &mut dyn Write) -> Result<()> {
        let kind = view.kind.to_lowercase();
        for name in &view.names {
            match &self.operation {
                Some(op) => writeln!(out, "{kind}/{name} {op}")?,
                None => writeln!(out, "{kind}/{name}")?,
            }
        }
        Ok(())
    }
}

pub struct TableRenderer;

impl Renderer for TableRenderer {
    fn render(&self, view: &View, out: &mut dyn Write) -> Result<()> {
        if view.is_list && view.rows.is_empty() {
            writeln!(out, "No items found.")?;
            return Ok(());
        }

        let mut table = Table::new();
        table
            .load_preset(NOTHING)
            .set_content_arrangement(ContentArrangement::Disabled);

        table.set_header(view.headers.clone());
        for row in &view.rows {
            table.add_row(row.clone());
        }

        writeln!(out, "{table}")?;
        Ok(())
    }
}

pub type NewRenderer = fn(&RenderOptions) -> Box<dyn Renderer>;

/// Renderer constructors by output name.
#[derive(Default)]
pub struct Registry {
    constructors: BTreeMap<&'static str, NewRenderer>,
}

impl Registry {
    /// Registry holding `json`, `yaml`, `name` and `table`.
    pub fn with_defaults() -> Self {
        let defaults: [(&'static str, NewRenderer); 4] = [
            ("json", |o| Box::new(JsonRenderer { pretty: o.pretty })),
            ("yaml", |_| Box::new(YamlRenderer)),
            ("name", |o| {
                Box::new(NameRenderer {
                    operation: o.operation.clone(),
                })
            }),
            ("table", |_| Box::new(TableRenderer)),
        ];
        Self {
            constructors: defaults.into_iter().collect(),
        }
    }

    pub fn register(&mut self, name: &'static str, constructor: NewRenderer) -> Result<()> {
        if self.constructors.contains_key(name) {
            bail!("renderer {name:?} is already registered");
        }
        self.constructors.insert(name, constructor);
        Ok(())
    }

    pub fn create(&self, name: &str, options: &RenderOptions) -> Result<Box<dyn Renderer>> {
        let constructor = self.constructors.get(name).ok_or_else(|| {
            let known: Vec<_> = self.constructors.keys().copied().collect();
            anyhow!("unknown renderer {name:?} (available: {})", known.join(", "))
        })?;
        Ok(constructor(options))
    }
}

/// Output settings of one invocation.
pub struct Output {
    registry: Registry,
    format: String,
    pretty: bool,
}

impl Output {
    pub fn new(registry: Registry, format: impl Into<String>, pretty: bool) -> Result<Self> {
        let format = format.into();
        registry.create(&format, &RenderOptions::default())?;
        Ok(Self {
            registry,
            format,
            pretty,
        })
    }

    pub fn render_to(&self, view: &View, operation: Option<&str>, out: &mut dyn Write) -> Result<()> {
        let options = RenderOptions {
            pretty: self.pretty,
            operation: operation.map(str::to_string),
        };
        self.registry.create(&self.format, &options)?.render(view, out)
    }

    pub fn render(&self, view: &View, operation: Option<&str>) -> Result<()> {
        let stdout = std::io::stdout();
        let mut lock = stdout.lock();
        self.render_to(view, operation, &mut lock)
    }

    /// Deletions always report as `<kind>/<name> deleted`.
    pub fn deleted(&self, kind: &'static str, name: impl Into<String>) -> Result<()> {
        let options = RenderOptions {
            pretty: self.pretty,
            operation: Some("deleted".to_string()),
        };
        let stdout = std::io::stdout();
        let mut lock = stdout.lock();
        self.registry
            .create("name", &options)?
            .render(&View::identity(kind, name), &mut lock)
    }
}

// ============================================================================
// Table columns
// ============================================================================

fn opt_ip(ip: &Option<IpAddr>) -> String {
    ip.map(|ip| ip.to_string()).unwrap_or_default()
}

fn join<T: ToString>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

impl TableDisplay for Interface {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "VNI", "Device", "IPs", "UnderlayRoute"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.meta.id.clone(),
            self.spec.vni.to_string(),
            self.spec.device.clone(),
            join(&self.spec.ips),
            opt_ip(&self.status.underlay_route),
        ]
    }
}

impl TableDisplay for VirtualIp {
    fn headers() -> Vec<&'static str> {
        vec!["InterfaceID", "IP", "UnderlayRoute"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.meta.interface_id.clone(),
            self.spec.ip.to_string(),
            opt_ip(&self.status.underlay_route),
        ]
    }
}

impl TableDisplay for Prefix {
    fn headers() -> Vec<&'static str> {
        vec!["InterfaceID", "Prefix", "UnderlayRoute"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.meta.interface_id.clone(),
            self.spec.prefix.to_string(),
            opt_ip(&self.status.underlay_route),
        ]
    }
}

impl TableDisplay for Route {
    fn headers() -> Vec<&'static str> {
        vec!["VNI", "Prefix", "NextHopVNI", "NextHopIP"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.meta.vni.to_string(),
            self.spec.prefix.to_string(),
            self.spec.next_hop.vni.to_string(),
            self.spec.next_hop.ip.to_string(),
        ]
    }
}

impl TableDisplay for LoadBalancer {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "VNI", "VIP", "Ports", "UnderlayRoute"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.meta.id.clone(),
            self.spec.vni.to_string(),
            self.spec.vip.to_string(),
            join(&self.spec.ports),
            opt_ip(&self.status.underlay_route),
        ]
    }
}

impl TableDisplay for LoadBalancerTarget {
    fn headers() -> Vec<&'static str> {
        vec!["LoadBalancerID", "TargetIP"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.meta.load_balancer_id.clone(),
            self.spec.target_ip.to_string(),
        ]
    }
}

impl TableDisplay for Nat {
    fn headers() -> Vec<&'static str> {
        vec!["InterfaceID", "NatIP", "MinPort", "MaxPort", "UnderlayRoute"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.meta.interface_id.clone(),
            self.spec.nat_ip.to_string(),
            self.spec.min_port.to_string(),
            self.spec.max_port.to_string(),
            opt_ip(&self.status.underlay_route),
        ]
    }
}

impl TableDisplay for NatEntry {
    fn headers() -> Vec<&'static str> {
        vec!["NatIP", "Kind", "IP", "MinPort", "MaxPort", "VNI", "UnderlayRoute"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.meta.nat_ip.to_string(),
            self.spec.kind.to_string(),
            opt_ip(&self.spec.ip),
            self.spec.min_port.to_string(),
            self.spec.max_port.to_string(),
            self.spec.vni.to_string(),
            opt_ip(&self.status.underlay_route),
        ]
    }
}

impl TableDisplay for Vni {
    fn headers() -> Vec<&'static str> {
        vec!["VNI", "Type", "InUse"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.meta.vni.to_string(),
            self.meta.kind.to_string(),
            self.spec.in_use.to_string(),
        ]
    }
}

impl TableDisplay for Version {
    fn headers() -> Vec<&'static str> {
        vec![
            "ClientProtocol",
            "ClientName",
            "ClientVersion",
            "ServiceProtocol",
            "ServiceVersion",
        ]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.spec.client_protocol.clone(),
            self.spec.client_name.clone(),
            self.spec.client_version.clone(),
            self.spec.service_protocol.clone(),
            self.spec.service_version.clone(),
        ]
    }
}

impl TableDisplay for Init {
    fn headers() -> Vec<&'static str> {
        vec!["UUID"]
    }

    fn row(&self) -> Vec<String> {
        vec![self.spec.uuid.clone()]
    }
}

impl TableDisplay for FirewallRule {
    fn headers() -> Vec<&'static str> {
        vec![
            "InterfaceID",
            "RuleID",
            "Direction",
            "Action",
            "Priority",
            "Source",
            "Destination",
            "Protocol",
        ]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.meta.interface_id.clone(),
            self.meta.rule_id.clone(),
            self.spec.direction.to_string(),
            self.spec.action.to_string(),
            self.spec.priority.to_string(),
            self.spec.source_prefix.to_string(),
            self.spec.destination_prefix.to_string(),
            self.spec
                .protocol_filter
                .map(|f| f.to_string())
                .unwrap_or_else(|| "any".to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dpservice_common::{
        FirewallAction, FirewallRuleSpec, InterfaceSpec, LoadBalancerSpec, PortFilter,
        ProtocolFilter, Status, TrafficDirection,
    };

    fn interface() -> Interface {
        let mut iface = Interface::new(
            "vm-1",
            InterfaceSpec {
                vni: 100,
                device: "net_tap3".to_string(),
                ips: vec!["10.0.0.1".parse().unwrap(), "fd00::1".parse().unwrap()],
            },
        );
        iface.status = Status::with_underlay_route("ff80::2".parse().unwrap());
        iface
    }

    fn render(format: &str, pretty: bool, view: &View, operation: Option<&str>) -> String {
        let output = Output::new(Registry::with_defaults(), format, pretty).unwrap();
        let mut buf = Vec::new();
        output.render_to(view, operation, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_registry_rejects_duplicates_and_unknown_names() {
        let mut registry = Registry::with_defaults();
        let err = registry
            .register("json", |_| Box::new(YamlRenderer))
            .unwrap_err();
        assert!(err.to_string().contains("already registered"));

        assert!(registry.create("xml", &RenderOptions::default()).is_err());
        assert!(Output::new(Registry::with_defaults(), "xml", false).is_err());

        registry.register("wide", |_| Box::new(TableRenderer)).unwrap();
        assert!(registry.create("wide", &RenderOptions::default()).is_ok());
    }

    #[test]
    fn test_name_renderer() {
        let view = View::object(&interface()).unwrap();
        assert_eq!(render("name", false, &view, Some("created")), "interface/vm-1 created\n");
        assert_eq!(render("name", false, &view, None), "interface/vm-1\n");
    }

    #[test]
    fn test_name_renderer_lists_every_item() {
        let routes = List::new(vec![
            Route::new(100, "10.0.0.0/24".parse().unwrap(), 200, "ff80::1".parse().unwrap()),
            Route::new(100, "10.0.1.0/24".parse().unwrap(), 200, "ff80::1".parse().unwrap()),
        ]);
        let view = View::list(&routes).unwrap();
        assert_eq!(
            render("name", false, &view, None),
            "route/10.0.0.0/24-200:ff80::1\nroute/10.0.1.0/24-200:ff80::1\n"
        );
    }

    #[test]
    fn test_json_renderer_tags_kind() {
        let view = View::object(&interface()).unwrap();
        let compact = render("json", false, &view, None);
        let value: Value = serde_json::from_str(&compact).unwrap();
        assert_eq!(value["kind"], "Interface");
        assert_eq!(value["meta"]["id"], "vm-1");
        assert_eq!(value["status"]["underlayRoute"], "ff80::2");
        assert_eq!(compact.lines().count(), 1);

        let pretty = render("json", true, &view, None);
        assert!(pretty.lines().count() > 1);
        assert!(pretty.contains("  \"kind\": \"Interface\""));
    }

    #[test]
    fn test_json_renderer_list_kind() {
        let view = View::list(&List::new(vec![interface()])).unwrap();
        let value: Value = serde_json::from_str(&render("json", false, &view, None)).unwrap();
        assert_eq!(value["kind"], "InterfaceList");
        assert_eq!(value["items"][0]["kind"], "Interface");
    }

    #[test]
    fn test_yaml_renderer() {
        let view = View::object(&interface()).unwrap();
        let yaml = render("yaml", false, &view, None);
        assert!(yaml.contains("kind: Interface"));
        assert!(yaml.contains("id: vm-1"));
    }

    #[test]
    fn test_table_renderer() {
        let lb = LoadBalancer::new(
            "4",
            LoadBalancerSpec {
                vni: 100,
                vip: "10.20.30.40".parse().unwrap(),
                ports: vec!["TCP/443".parse().unwrap(), "UDP/53".parse().unwrap()],
            },
        );
        let table = render("table", false, &View::object(&lb).unwrap(), None);
        let header = table.lines().find(|l| l.contains("Ports")).unwrap();
        for column in ["ID", "VNI", "VIP", "Ports", "UnderlayRoute"] {
            assert!(header.contains(column));
        }
        let row = table.lines().find(|l| l.contains("10.20.30.40")).unwrap();
        assert!(row.contains("TCP/443,UDP/53"));
        assert!(!table.contains('│'));
    }

    #[test]
    fn test_table_renderer_empty_list() {
        let view = View::list(&List::<Nat>::new(Vec::new())).unwrap();
        assert_eq!(render("table", false, &view, None), "No items found.\n");
    }

    #[test]
    fn test_identity_view() {
        let view = View::identity("LoadBalancer", "4");
        assert_eq!(render("name", false, &view, Some("deleted")), "loadbalancer/4 deleted\n");
        assert_eq!(view.value["name"], "4");
    }

    #[test]
    fn test_firewall_rule_table_row() {
        let mut rule = FirewallRule::new(
            "vm-1",
            "fw-1",
            FirewallRuleSpec {
                direction: TrafficDirection::Ingress,
                action: FirewallAction::Accept,
                priority: 1000,
                source_prefix: "0.0.0.0/0".parse().unwrap(),
                destination_prefix: "10.0.0.0/24".parse().unwrap(),
                protocol_filter: None,
            },
        );
        assert_eq!(rule.row().last().map(String::as_str), Some("any"));

        rule.spec.protocol_filter = Some(ProtocolFilter::Tcp(PortFilter {
            src_ports: None,
            dst_ports: Some("443".parse().unwrap()),
        }));
        let table = render("table", false, &View::object(&rule).unwrap(), None);
        let row = table.lines().find(|l| l.contains("fw-1")).unwrap();
        assert!(row.contains("ingress"));
        assert!(row.contains("tcp dst 443"));
        assert_eq!(
            render("name", false, &View::object(&rule).unwrap(), Some("created")),
            "firewallrule/fw-1 created\n"
        );
    }
}
