//! Repräsentiert einen einzelnen Knoten eines Event-Baums.
//!
//! Ein Knoten ist entweder eine Verzweigung (`Branch`) mit zwei benannten
//! Kind-Sequenzen oder eine Blatt-Aktion (Item, Kreatur, Affliction).
//! Die Form ist pro Art fest: Ein `Branch` hat immer beide Sequenzen,
//! ein Blatt hat nie Kinder.

use super::probability::sanitize_probability;
use serde::de::DeserializeOwned;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// Standard-Wahrscheinlichkeit einer neu erzeugten Verzweigung.
pub const DEFAULT_SPLIT_PROBABILITY: f64 = 0.5;
/// Standard-Stärke einer neuen Affliction.
pub const DEFAULT_AFFLICTION_STRENGTH: f64 = 10.0;
/// Größte vergebbare Knoten-ID. `u64::MAX` bleibt als Allocator-Endstand frei.
pub const MAX_NODE_ID: u64 = u64::MAX - 1;

/// Art eines Knotens ohne Nutzdaten (Factory-Argument und JSON-Tag)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKindTag {
    /// Probabilistische Verzweigung
    Branch,
    /// Item spawnen
    SpawnItem,
    /// Kreatur spawnen
    SpawnCreature,
    /// Affliction anwenden
    ApplyAffliction,
}

impl NodeKindTag {
    /// Alle Knotenarten in Menü-Reihenfolge.
    pub const ALL: [NodeKindTag; 4] = [
        NodeKindTag::Branch,
        NodeKindTag::SpawnItem,
        NodeKindTag::SpawnCreature,
        NodeKindTag::ApplyAffliction,
    ];

    /// Gibt `true` zurück für Arten, die Kinder besitzen.
    pub fn has_children(self) -> bool {
        matches!(self, NodeKindTag::Branch)
    }
}

/// Benannte Kind-Sequenz einer Verzweigung
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BranchSide {
    /// Zweig mit Wahrscheinlichkeit `p`
    #[serde(rename = "onSuccess")]
    Success,
    /// Zweig mit Wahrscheinlichkeit `1 - p`
    #[serde(rename = "onFailure")]
    Failure,
}

/// Qualitätsstufe eines gespawnten Items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ItemQuality {
    #[default]
    Normal,
    Good,
    Excellent,
    Masterwork,
}

impl ItemQuality {
    /// Numerische Qualitätsstufe (0–3) wie im XML erwartet.
    pub fn level(self) -> u8 {
        match self {
            ItemQuality::Normal => 0,
            ItemQuality::Good => 1,
            ItemQuality::Excellent => 2,
            ItemQuality::Masterwork => 3,
        }
    }
}

/// Spawn-Ort einer Kreatur
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SpawnLocation {
    /// Im Haupt-U-Boot
    #[default]
    MainSub,
    /// Im Außenposten
    Outpost,
    /// Auf dem Hauptpfad des Levels
    MainPath,
    /// In der Nähe des Spielers
    Nearby,
}

impl SpawnLocation {
    /// Attributwert im XML.
    pub fn xml_name(self) -> &'static str {
        match self {
            SpawnLocation::MainSub => "MainSub",
            SpawnLocation::Outpost => "Outpost",
            SpawnLocation::MainPath => "MainPath",
            SpawnLocation::Nearby => "Nearby",
        }
    }
}

/// Ziel einer Affliction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AfflictionTarget {
    #[default]
    Player,
    Crew,
    AllCharacters,
}

impl AfflictionTarget {
    /// Attributwert im XML.
    pub fn xml_name(self) -> &'static str {
        match self {
            AfflictionTarget::Player => "player",
            AfflictionTarget::Crew => "crew",
            AfflictionTarget::AllCharacters => "all",
        }
    }
}

/// Parameter einer Verzweigung
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchParams {
    /// Wahrscheinlichkeit des Success-Zweigs, immer in `[0, 1]`
    pub split_probability: f64,
}

impl Default for BranchParams {
    fn default() -> Self {
        Self {
            split_probability: DEFAULT_SPLIT_PROBABILITY,
        }
    }
}

impl BranchParams {
    /// Liest die Parameter tolerant aus JSON: fehlende oder nicht-numerische
    /// Werte ergeben 0.
    fn from_value(value: &Value) -> Self {
        let raw = match value.get("splitProbability") {
            Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
            Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
            _ => 0.0,
        };
        Self {
            split_probability: sanitize_probability(raw),
        }
    }
}

/// Parameter einer Item-Spawn-Aktion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpawnItemParams {
    /// Item-Identifier aus dem Spielkatalog (nicht validiert)
    pub item_identifier: String,
    /// Anzahl, mindestens 1
    pub amount: u32,
    /// Qualitätsstufe
    pub quality: ItemQuality,
}

impl Default for SpawnItemParams {
    fn default() -> Self {
        Self {
            item_identifier: String::new(),
            amount: 1,
            quality: ItemQuality::Normal,
        }
    }
}

/// Parameter einer Kreatur-Spawn-Aktion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpawnCreatureParams {
    /// Spezies-Identifier (nicht validiert)
    pub creature_identifier: String,
    /// Anzahl, mindestens 1
    pub count: u32,
    pub spawn_location: SpawnLocation,
    /// Spawn-Position zufällig streuen
    pub randomize: bool,
}

impl Default for SpawnCreatureParams {
    fn default() -> Self {
        Self {
            creature_identifier: String::new(),
            count: 1,
            spawn_location: SpawnLocation::MainSub,
            randomize: false,
        }
    }
}

/// Parameter einer Affliction-Aktion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApplyAfflictionParams {
    /// Affliction-Identifier (nicht validiert)
    pub affliction_identifier: String,
    /// Stärke, nicht negativ
    pub strength: f64,
    pub target: AfflictionTarget,
}

impl Default for ApplyAfflictionParams {
    fn default() -> Self {
        Self {
            affliction_identifier: String::new(),
            strength: DEFAULT_AFFLICTION_STRENGTH,
            target: AfflictionTarget::Player,
        }
    }
}

/// Die beiden Kind-Sequenzen einer Verzweigung
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BranchChildren {
    pub on_success: Vec<Node>,
    pub on_failure: Vec<Node>,
}

impl BranchChildren {
    /// Liefert die Sequenz einer Seite.
    pub fn side(&self, side: BranchSide) -> &Vec<Node> {
        match side {
            BranchSide::Success => &self.on_success,
            BranchSide::Failure => &self.on_failure,
        }
    }

    /// Liefert die Sequenz einer Seite (mutable).
    pub fn side_mut(&mut self, side: BranchSide) -> &mut Vec<Node> {
        match side {
            BranchSide::Success => &mut self.on_success,
            BranchSide::Failure => &mut self.on_failure,
        }
    }
}

/// Art eines Knotens inklusive ihrer Parameter
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Branch {
        params: BranchParams,
        children: BranchChildren,
    },
    SpawnItem(SpawnItemParams),
    SpawnCreature(SpawnCreatureParams),
    ApplyAffliction(ApplyAfflictionParams),
}

impl NodeKind {
    /// Erzeugt eine Art mit vollständig gesetzten Standardparametern.
    pub fn with_defaults(tag: NodeKindTag) -> Self {
        match tag {
            NodeKindTag::Branch => NodeKind::Branch {
                params: BranchParams::default(),
                children: BranchChildren::default(),
            },
            NodeKindTag::SpawnItem => NodeKind::SpawnItem(SpawnItemParams::default()),
            NodeKindTag::SpawnCreature => NodeKind::SpawnCreature(SpawnCreatureParams::default()),
            NodeKindTag::ApplyAffliction => {
                NodeKind::ApplyAffliction(ApplyAfflictionParams::default())
            }
        }
    }

    /// Tag der Art.
    pub fn tag(&self) -> NodeKindTag {
        match self {
            NodeKind::Branch { .. } => NodeKindTag::Branch,
            NodeKind::SpawnItem(_) => NodeKindTag::SpawnItem,
            NodeKind::SpawnCreature(_) => NodeKindTag::SpawnCreature,
            NodeKind::ApplyAffliction(_) => NodeKindTag::ApplyAffliction,
        }
    }
}

/// Parameter eines Knotens ohne Kinder, für Bearbeitungen über die Session.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeParams {
    Branch(BranchParams),
    SpawnItem(SpawnItemParams),
    SpawnCreature(SpawnCreatureParams),
    ApplyAffliction(ApplyAfflictionParams),
}

impl NodeParams {
    /// Tag der Art, zu der diese Parameter gehören.
    pub fn tag(&self) -> NodeKindTag {
        match self {
            NodeParams::Branch(_) => NodeKindTag::Branch,
            NodeParams::SpawnItem(_) => NodeKindTag::SpawnItem,
            NodeParams::SpawnCreature(_) => NodeKindTag::SpawnCreature,
            NodeParams::ApplyAffliction(_) => NodeKindTag::ApplyAffliction,
        }
    }

    /// Bringt alle Werte in ihren gültigen Bereich.
    ///
    /// Wahrscheinlichkeiten werden auf `[0, 1]` geklemmt (NaN → 0),
    /// Anzahlen auf mindestens 1, Stärken auf nicht-negative endliche Werte.
    pub fn sanitized(self) -> Self {
        match self {
            NodeParams::Branch(mut p) => {
                p.split_probability = sanitize_probability(p.split_probability);
                NodeParams::Branch(p)
            }
            NodeParams::SpawnItem(mut p) => {
                p.amount = p.amount.max(1);
                NodeParams::SpawnItem(p)
            }
            NodeParams::SpawnCreature(mut p) => {
                p.count = p.count.max(1);
                NodeParams::SpawnCreature(p)
            }
            NodeParams::ApplyAffliction(mut p) => {
                p.strength = if p.strength.is_finite() {
                    p.strength.max(0.0)
                } else {
                    0.0
                };
                NodeParams::ApplyAffliction(p)
            }
        }
    }
}

/// Ein Knoten eines Event-Baums
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "NodeRecord")]
pub struct Node {
    /// Innerhalb der Session eindeutige ID
    pub id: u64,
    /// Art und Parameter
    pub kind: NodeKind,
}

impl Node {
    /// Erstellt einen Knoten mit Standardparametern.
    ///
    /// Vergibt keine ID: Aufrufer holen sie vom ID-Allocator der Session.
    pub fn new(id: u64, tag: NodeKindTag) -> Self {
        Self {
            id,
            kind: NodeKind::with_defaults(tag),
        }
    }

    /// Tag der Knotenart.
    pub fn tag(&self) -> NodeKindTag {
        self.kind.tag()
    }

    /// Gibt `true` zurück für Verzweigungen.
    pub fn is_branch(&self) -> bool {
        matches!(self.kind, NodeKind::Branch { .. })
    }

    /// Kind-Sequenzen, nur bei Verzweigungen vorhanden.
    pub fn children(&self) -> Option<&BranchChildren> {
        match &self.kind {
            NodeKind::Branch { children, .. } => Some(children),
            _ => None,
        }
    }

    /// Kind-Sequenzen (mutable), nur bei Verzweigungen vorhanden.
    pub fn children_mut(&mut self) -> Option<&mut BranchChildren> {
        match &mut self.kind {
            NodeKind::Branch { children, .. } => Some(children),
            _ => None,
        }
    }

    /// Eine benannte Kind-Sequenz (mutable).
    pub fn branch_mut(&mut self, side: BranchSide) -> Option<&mut Vec<Node>> {
        self.children_mut().map(|c| c.side_mut(side))
    }

    /// Split-Wahrscheinlichkeit, nur bei Verzweigungen.
    pub fn split_probability(&self) -> Option<f64> {
        match &self.kind {
            NodeKind::Branch { params, .. } => Some(params.split_probability),
            _ => None,
        }
    }

    /// Aktuelle Parameter als eigenständiger Wert.
    pub fn params(&self) -> NodeParams {
        match &self.kind {
            NodeKind::Branch { params, .. } => NodeParams::Branch(params.clone()),
            NodeKind::SpawnItem(p) => NodeParams::SpawnItem(p.clone()),
            NodeKind::SpawnCreature(p) => NodeParams::SpawnCreature(p.clone()),
            NodeKind::ApplyAffliction(p) => NodeParams::ApplyAffliction(p.clone()),
        }
    }

    /// Ersetzt die Parameter. Gibt `false` zurück, wenn die Art nicht passt.
    ///
    /// Werte werden vor dem Schreiben in ihren gültigen Bereich gebracht.
    pub fn set_params(&mut self, params: NodeParams) -> bool {
        match (&mut self.kind, params.sanitized()) {
            (NodeKind::Branch { params: current, .. }, NodeParams::Branch(p)) => *current = p,
            (NodeKind::SpawnItem(current), NodeParams::SpawnItem(p)) => *current = p,
            (NodeKind::SpawnCreature(current), NodeParams::SpawnCreature(p)) => *current = p,
            (NodeKind::ApplyAffliction(current), NodeParams::ApplyAffliction(p)) => *current = p,
            _ => return false,
        }
        true
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let field_count = if self.is_branch() { 4 } else { 3 };
        let mut record = serializer.serialize_struct("Node", field_count)?;
        record.serialize_field("id", &self.id)?;
        record.serialize_field("kind", &self.tag())?;
        match &self.kind {
            NodeKind::Branch { params, children } => {
                record.serialize_field("parameters", params)?;
                record.serialize_field("children", children)?;
            }
            NodeKind::SpawnItem(p) => record.serialize_field("parameters", p)?,
            NodeKind::SpawnCreature(p) => record.serialize_field("parameters", p)?,
            NodeKind::ApplyAffliction(p) => record.serialize_field("parameters", p)?,
        }
        record.end()
    }
}

/// JSON-Form eines Knotens vor der Umwandlung in den typisierten Knoten.
#[derive(Deserialize)]
struct NodeRecord {
    id: u64,
    kind: NodeKindTag,
    #[serde(default)]
    parameters: Value,
    #[serde(default)]
    children: Option<BranchChildren>,
}

impl From<NodeRecord> for Node {
    fn from(record: NodeRecord) -> Self {
        if !record.kind.has_children() {
            if let Some(children) = record.children.as_ref() {
                let dropped = children.on_success.len() + children.on_failure.len();
                if dropped > 0 {
                    log::warn!(
                        "Node {} ({:?}) hat keine Kinder, verwerfe {} Kind-Knoten",
                        record.id,
                        record.kind,
                        dropped
                    );
                }
            }
        }
        let kind = match record.kind {
            NodeKindTag::Branch => NodeKind::Branch {
                params: BranchParams::from_value(&record.parameters),
                children: record.children.unwrap_or_default(),
            },
            NodeKindTag::SpawnItem => NodeKind::SpawnItem(lenient_params(record.id, record.parameters)),
            NodeKindTag::SpawnCreature => {
                NodeKind::SpawnCreature(lenient_params(record.id, record.parameters))
            }
            NodeKindTag::ApplyAffliction => {
                NodeKind::ApplyAffliction(lenient_params(record.id, record.parameters))
            }
        };
        let mut node = Node { id: record.id, kind };
        let params = node.params();
        node.set_params(params);
        node
    }
}

/// Liest Blatt-Parameter feldweise: Ein fehlerhaftes Feld fällt auf seinen
/// Standardwert zurück, gültige Felder bleiben erhalten.
fn lenient_params<T: Serialize + DeserializeOwned + Default>(id: u64, value: Value) -> T {
    let incoming = match value {
        Value::Null => return T::default(),
        Value::Object(map) => map,
        other => {
            log::warn!("Node {}: Parameter sind kein Objekt ({}), verwende Standardwerte", id, other);
            return T::default();
        }
    };
    let Ok(Value::Object(mut merged)) = serde_json::to_value(T::default()) else {
        return T::default();
    };

    for (key, field) in incoming {
        let previous = merged.insert(key.clone(), field);
        if serde_json::from_value::<T>(Value::Object(merged.clone())).is_err() {
            log::warn!("Node {}: Parameter '{}' fehlerhaft, verwende Standardwert", id, key);
            match previous {
                Some(default) => merged.insert(key, default),
                None => merged.remove(&key),
            };
        }
    }

    serde_json::from_value(Value::Object(merged)).unwrap_or_default()
}
